pub mod access_control;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod errors;
pub mod list_lookup;
pub mod mailman;
pub mod models;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
