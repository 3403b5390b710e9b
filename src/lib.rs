//! Travel Preference Memory
//!
//! A per-user preference memory backed by a document store, plus a
//! heuristic engine that turns stored travel preferences into a flight
//! offer:
//! - One JSON document per user, category → ordered, deduplicated strings
//! - Seat/airline classification of free-text travel preferences
//! - Offer synthesis from the classified preferences
//! - Tool and HTTP surfaces for an agent layer
//!
//! FLOW:
//! ADD → STORE ... RECOMMEND → READ → CLASSIFY → SYNTHESIZE

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod recommendation;
pub mod service;
pub mod state;
pub mod tools;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use classifier::{ClassifiedPreferences, PreferenceClassifier};
pub use service::PreferenceService;
