//! # API Shared
//!
//! Shared utilities and definitions for the MCG APIs.
//!
//! Contains:
//! - Startup configuration (`config`)
//! - Login and token verification (`auth`)
//! - `HealthService`
//!
//! Used by `api-rest` and the `mcg-run` binary.

pub mod auth;
pub mod config;
pub mod health;

pub use auth::{AuthService, Claims};
pub use config::{ApiConfig, ConfigError, TokenConfig};
pub use health::{HealthRes, HealthService};
