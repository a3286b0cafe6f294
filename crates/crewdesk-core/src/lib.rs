//! Core types and trait definitions for the Crewdesk recruitment service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the web surface both depend on it.

pub mod admin;
pub mod crew;
pub mod document;
pub mod error;
pub mod form;
pub mod staff;
pub mod status;
pub mod store;
pub mod token;

pub use error::{Error, Result};
