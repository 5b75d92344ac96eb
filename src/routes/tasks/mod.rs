pub mod task_handlers;
pub mod task_models;
pub mod task_validation;
