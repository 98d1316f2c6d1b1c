//! Heart-rate dashboard: a small JSON data service and the client that
//! renders it.

pub mod config;
pub mod dashboard;
pub mod data_files;
pub mod error;
pub mod model;
pub mod pipeline_health;
pub mod routes;
pub mod search_users;
pub mod state;
