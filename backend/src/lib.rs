//! Counter Auth Backend Library
//!
//! Token authentication and role authorization for customers and managers.
//! This library exposes the backend modules for use in tests and the server
//! binary.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
