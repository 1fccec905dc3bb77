pub mod dashboard;
pub mod widgets;

pub use dashboard::{AdminDashboardPage, SupervisorDashboardPage, TechnicianDashboardPage};
