//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and mirror calls into screen-level flows.
//! - Keep front ends decoupled from storage and HTTP details.

pub mod note_service;
