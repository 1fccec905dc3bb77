pub mod calendar;
pub mod stats;

pub use calendar::CalendarPage;
