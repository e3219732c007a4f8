//! Core library components.
//!
//! This module contains the reusable logic: the parameter codec, the
//! encryption backends, the backend registry and the secret format.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod keys;
pub mod params;
pub mod registry;
pub mod secret;
pub mod secrets;
pub mod types;
