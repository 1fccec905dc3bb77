pub mod parts_repository;
pub mod repository;
pub mod service;
pub mod task_repository;
