//! Core business logic for saythat.

pub mod services;

pub use services::*;
