//! Domain models for quicknotes.
//!
//! # Core Concepts
//!
//! ## Persisted Entities
//!
//! - [`Note`]: A user-authored text record. The table service assigns its id
//!   and timestamp; the timestamp is replaced on every content edit and is the
//!   only sort key.
//!
//! ## Ephemeral Entities
//!
//! These live only in client memory:
//!
//! - [`SummaryRequest`]: The single summary dialog slot, pending or settled.
//! - The `is_editing` flag on [`Note`], which is never serialized.

mod note;
mod summary;

pub use note::*;
pub use summary::*;
