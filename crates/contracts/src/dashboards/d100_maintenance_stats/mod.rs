pub mod calendar;
pub mod dto;
