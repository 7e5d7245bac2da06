pub mod config;
pub mod handlers;
pub mod mailchimp;
pub mod models;
pub mod notify;
pub mod routes;
