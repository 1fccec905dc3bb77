pub mod repository;
pub mod service;
pub mod task_repository;
