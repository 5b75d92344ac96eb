//! Task board: a CRUD API for tasks backed by SQLite, plus the client-side
//! state a board UI keeps in sync with it.

pub mod client;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod routes;
pub mod services;

use actix_web::web;

/// Registers every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    routes::routes::root_configure(cfg);
    routes::routes::tasks_configure(cfg);
}
