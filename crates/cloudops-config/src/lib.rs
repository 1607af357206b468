//! CloudOps configuration
//!
//! Configuration is an explicit value: load it once at startup with
//! [`ClientConfig::load`] or [`ServiceEnv::load`] and pass it to the
//! components that need it.

#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod service;

pub use client::{ClientConfig, LOCAL_SECURE_ENDPOINT};
pub use error::{ConfigError, ConfigResult};
pub use service::ServiceEnv;
