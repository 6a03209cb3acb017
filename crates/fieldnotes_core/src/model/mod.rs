//! Domain model for field notes.
//!
//! # Responsibility
//! - Define the persisted `Note` shape and its optional attachments.
//! - Define the draft/patch inputs used by create and update paths.
//!
//! # Invariants
//! - `Note::date` is fixed at creation and never rewritten by updates.
//! - Serialized field names match the stored JSON record exactly.

pub mod note;
