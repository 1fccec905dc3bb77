pub mod d100_maintenance_stats;
pub mod d101_role_dashboard;
