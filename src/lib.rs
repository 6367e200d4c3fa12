//! # LearnIt
//!
//! A small learning tracker: users register, log in, and keep a personal
//! list of skills they are learning, each tagged TO LEARN / LEARNING /
//! LEARNED.
//!
//! The crate ships an HTTP API server (axum over `PostgreSQL`) plus a typed
//! client for it:
//!
//! - [`api`] - routes, handlers, and the JSON error envelope
//! - [`auth`] - password hashing, bearer token issuance/verification, and
//!   the per-request identity gate
//! - [`store`] - identity-scoped persistence over sqlx
//! - [`client`] - API client and the pure post-list state machine
//! - [`cli`] - argument parsing, telemetry bootstrap, and server startup

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod store;
