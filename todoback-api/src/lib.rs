//! # Todoback API Server Library
//!
//! HTTP surface of the to-do backend: configuration, the router, handlers
//! for users, tasks, todos, teams and memberships, and the error type that
//! turns lower-layer failures into status codes.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response header layers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
