//! Manager Assistant core: the project wizard's step registry and navigation
//! engine, plus session token validation with a time-boxed verdict cache.

pub mod api;
pub mod config;
pub mod logging;
pub mod persistence;
pub mod projects;
pub mod rest;
pub mod session;
pub mod wizard;
