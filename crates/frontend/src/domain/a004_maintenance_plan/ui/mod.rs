pub mod form;
pub mod list;
pub mod page;
pub mod tasks;
