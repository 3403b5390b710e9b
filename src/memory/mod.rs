//! Per-user preference memory
//!
//! Wraps a [`crate::state::DocumentStore`] with append-with-dedup and
//! category lookup semantics.

pub mod preferences;

pub use preferences::PreferenceStore;
