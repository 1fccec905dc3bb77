pub mod auth;
pub mod navigation;
pub mod uploads;
pub mod users;
