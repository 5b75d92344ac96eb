pub mod routes;
pub mod tasks;
