//! Core data models for the preference memory

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category read by the recommendation engine.
pub const TRAVEL_PREFERENCES: &str = "travel_preferences";

//
// ================= Identity =================
//

/// Identity of the user a call acts on behalf of.
///
/// Passed explicitly into every store, service and tool call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserContext {
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Key of this user's document in the document store
    pub fn document_key(&self) -> String {
        format!("user::{}", self.user_id)
    }
}

impl fmt::Display for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_id)
    }
}

//
// ================= Preferences =================
//

/// Ordered, duplicate-free list of preference strings.
///
/// Equality for dedup is exact and case-sensitive. Deserialization goes
/// through the same dedup, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PreferenceList {
    items: Vec<String>,
}

impl PreferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` unless an identical entry exists. Returns whether the
    /// list changed.
    pub fn push_unique(&mut self, text: &str) -> bool {
        if self.contains(text) {
            return false;
        }
        self.items.push(text.to_string());
        true
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.iter().any(|item| item == text)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<String>> for PreferenceList {
    fn from(raw: Vec<String>) -> Self {
        let mut list = PreferenceList::new();
        for item in raw {
            if !list.contains(&item) {
                list.items.push(item);
            }
        }
        list
    }
}

impl From<PreferenceList> for Vec<String> {
    fn from(list: PreferenceList) -> Self {
        list.items
    }
}

/// The complete per-user record: category name → preference list.
///
/// Serialized as a flat JSON object, e.g.
/// `{"travel_preferences": ["Window seat"], "sleep": ["8h"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceDocument {
    categories: BTreeMap<String, PreferenceList>,
}

impl PreferenceDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `text` to `category`, creating the category if needed.
    /// Returns whether the document changed.
    pub fn add(&mut self, category: &str, text: &str) -> bool {
        self.categories
            .entry(category.to_string())
            .or_default()
            .push_unique(text)
    }

    pub fn category(&self, category: &str) -> Option<&PreferenceList> {
        self.categories.get(category)
    }

    /// Preferences in `category`, empty when the category is absent
    pub fn items(&self, category: &str) -> Vec<String> {
        self.categories
            .get(category)
            .map(|list| list.as_slice().to_vec())
            .unwrap_or_default()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(|k| k.as_str())
    }
}

//
// ================= Offers =================
//

/// A synthesized flight recommendation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub airline: String,
    pub flight_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: String,
    pub notes: String,
}

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub data: serde_json::Value,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key() {
        let ctx = UserContext::new("Chris");
        assert_eq!(ctx.document_key(), "user::Chris");
    }

    #[test]
    fn test_push_unique_is_case_sensitive() {
        let mut list = PreferenceList::new();
        assert!(list.push_unique("Window seat"));
        assert!(!list.push_unique("Window seat"));
        assert!(list.push_unique("window seat"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let raw = r#"{"travel_preferences": ["A", "B", "A", "C", "B"], "sleep": []}"#;
        let doc: PreferenceDocument = serde_json::from_str(raw).unwrap();

        assert_eq!(doc.items("travel_preferences"), vec!["A", "B", "C"]);
        assert!(doc.category("sleep").unwrap().is_empty());
    }

    #[test]
    fn test_document_serializes_flat() {
        let mut doc = PreferenceDocument::new();
        doc.add("sleep", "8 hours");
        doc.add("travel_preferences", "Delta Airlines");

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sleep": ["8 hours"],
                "travel_preferences": ["Delta Airlines"],
            })
        );
    }

    #[test]
    fn test_add_reports_changes() {
        let mut doc = PreferenceDocument::new();
        assert!(doc.add("sleep", "8 hours"));
        assert!(!doc.add("sleep", "8 hours"));
        assert!(doc.add("sleep", "nap"));
        assert_eq!(doc.items("missing"), Vec::<String>::new());
    }
}
