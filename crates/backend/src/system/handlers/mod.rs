pub mod auth;
pub mod system;
pub mod uploads;
pub mod users;
