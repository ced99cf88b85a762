//! Route handlers for the REST API.

pub mod health;
pub mod projects;
pub mod session;
pub mod steps;
