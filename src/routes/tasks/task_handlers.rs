use actix_web::{web, HttpResponse, Responder};
use log::info;
use sqlx::SqlitePool;

use super::task_models::{TaskQueryParams, TaskRequestBody};
use super::task_validation::{parse_task_id, validate_create, validate_query, validate_update};
use crate::error::AppError;
use crate::services::task_service;

pub async fn root_get() -> impl Responder {
    HttpResponse::Ok().body("Hello, this is the task board API.")
}

// List tasks, optionally filtered by status, priority and creation date
pub async fn list_tasks(
    pool: web::Data<SqlitePool>,
    query: web::Query<TaskQueryParams>,
) -> Result<HttpResponse, AppError> {
    let filter = validate_query(&query)?;
    info!("Received request to list tasks with filter {:?}", filter);

    let tasks = task_service::list_tasks(pool.get_ref(), &filter).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn get_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_task_id(&path)?;
    info!("Received request to fetch task {}", id);

    let task = task_service::get_task(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(task))
}

pub async fn create_task(
    pool: web::Data<SqlitePool>,
    request: web::Json<TaskRequestBody>,
) -> Result<HttpResponse, AppError> {
    let input = validate_create(&request)?;
    info!("Received request to create task {:?} for user {}", input.title, input.user_id);

    let task = task_service::create_task(pool.get_ref(), input).await?;
    info!("Task {} created", task.task.id);
    Ok(HttpResponse::Created().json(task))
}

pub async fn update_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    request: web::Json<TaskRequestBody>,
) -> Result<HttpResponse, AppError> {
    let id = parse_task_id(&path)?;
    let patch = validate_update(&request)?;
    info!("Received request to update task {}", id);

    let task = task_service::update_task(pool.get_ref(), id, &patch).await?;
    Ok(HttpResponse::Ok().json(task))
}

pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_task_id(&path)?;
    info!("Received request to delete task {}", id);

    task_service::delete_task(pool.get_ref(), id).await?;
    info!("Task {} deleted", id);
    Ok(HttpResponse::NoContent().finish())
}
