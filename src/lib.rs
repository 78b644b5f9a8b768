pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
