//! Preference Classifier
//!
//! Splits free-text travel preferences into:
//! - Seat: mentions a seat position (e.g., "Window seat", "aisle please")
//! - Airline: anything else with at least one word (e.g., "Delta Airlines")

/// Static keyword lists — zero allocation
const SEAT_KEYWORDS: &[&str] = &["window", "aisle", "middle"];

const AIRLINE_KEYWORDS: &[&str] = &["air", "jet", "airlines"];

/// Result of classifying a user's travel preferences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedPreferences {
    pub seat: Option<String>,
    pub airline: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKind {
    Seat,
    Airline,
}

/// Preference classifier
pub struct PreferenceClassifier;

impl PreferenceClassifier {
    /// Classify a single preference string.
    ///
    /// Seat keywords are checked first and win over airline matching.
    pub fn kind_of(preference: &str) -> Option<PreferenceKind> {
        let lowered = preference.to_lowercase();

        if SEAT_KEYWORDS.iter().any(|kw| lowered.contains(*kw)) {
            Some(PreferenceKind::Seat)
        } else if AIRLINE_KEYWORDS.iter().any(|kw| lowered.contains(*kw))
            || has_any_token(&lowered)
        {
            // NOTE: the token fallback makes nearly every non-seat string an
            // airline (e.g. "vegetarian meal"). Kept for compatibility with
            // stored data; tightening it needs a product decision.
            Some(PreferenceKind::Airline)
        } else {
            None
        }
    }

    /// Classify preferences in stored order. The last match of each kind wins.
    pub fn classify<S: AsRef<str>>(preferences: &[S]) -> ClassifiedPreferences {
        let mut result = ClassifiedPreferences::default();

        for pref in preferences {
            let pref = pref.as_ref();
            match Self::kind_of(pref) {
                Some(PreferenceKind::Seat) => result.seat = Some(pref.to_string()),
                Some(PreferenceKind::Airline) => result.airline = Some(pref.to_string()),
                None => {}
            }
        }

        result
    }
}

/// True when `text` has at least one word. Separators are Unicode
/// whitespace plus the ASCII information separators U+001C..=U+001F, the
/// set older stored preferences were tokenized with.
fn has_any_token(text: &str) -> bool {
    text.chars().any(|c| !is_separator(c))
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
