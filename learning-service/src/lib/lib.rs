//! Identity and access service for the learning platform.
//!
//! Accounts, login and registration, stateless password reset, and the role
//! policies that guard the platform's HTTP API.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::access;
pub use domain::identity;
pub use outbound::repositories;
