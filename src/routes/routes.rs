use actix_web::{error, web};

use super::tasks::task_handlers;
use crate::error::AppError;

pub fn root_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(task_handlers::root_get));
}

pub fn tasks_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            // Malformed bodies and query strings are validation failures too
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                error::Error::from(AppError::Validation(err.to_string()))
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                error::Error::from(AppError::Validation(format!("Invalid query parameters: {err}")))
            }))
            .route("", web::get().to(task_handlers::list_tasks))
            .route("/", web::get().to(task_handlers::list_tasks))
            .route("", web::post().to(task_handlers::create_task))
            .route("/", web::post().to(task_handlers::create_task))
            .route("/{id}", web::get().to(task_handlers::get_task))
            .route("/{id}", web::put().to(task_handlers::update_task))
            .route("/{id}", web::delete().to(task_handlers::delete_task))
    );
}
