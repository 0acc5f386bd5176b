pub mod credentials;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod ports;
pub mod service;
