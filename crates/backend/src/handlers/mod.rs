pub mod a001_site;
pub mod a002_production_line;
pub mod a003_equipment;
pub mod a004_maintenance_plan;
pub mod a005_scheduled_maintenance;
pub mod a006_intervention;
pub mod d100_maintenance_stats;
pub mod d101_role_dashboard;
