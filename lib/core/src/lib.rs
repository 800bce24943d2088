//! Core domain types and utilities for the wicket authentication service.
//!
//! This crate provides the foundational types and error handling shared
//! by the rest of the workspace.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, UserId};
