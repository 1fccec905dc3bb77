pub mod api;
pub mod month_grid;
pub mod ui;
