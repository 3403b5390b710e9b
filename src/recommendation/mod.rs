//! Recommendation engine
//!
//! Turns a user's stored travel preferences into a synthesized flight offer.
//! No flight search is performed; offers are generated locally and never
//! persisted.

use crate::classifier::{ClassifiedPreferences, PreferenceClassifier};
use crate::memory::PreferenceStore;
use crate::models::{FlightOffer, UserContext, TRAVEL_PREFERENCES};
use crate::Result;
use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;
use tracing::info;

pub const NO_AIRLINE_MESSAGE: &str =
    "No airline preference found. Please add a preferred airline first.";

const FLIGHT_NUMBER_RANGE: RangeInclusive<u32> = 100..=999;
const DEPARTURE_OFFSET_HOURS: Range<i64> = 2..5;
const ARRIVAL_OFFSET_HOURS: Range<i64> = 10..14;
const PRICE_RANGE_EUR: RangeInclusive<u32> = 800..=1800;

/// Outcome of a recommendation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Offers(Vec<FlightOffer>),
    /// The user has no airline preference stored yet
    NoAirlinePreference { message: String },
}

pub struct RecommendationEngine {
    store: Arc<PreferenceStore>,
}

impl RecommendationEngine {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }

    /// Recommend flights to `destination` for the user in `ctx`.
    ///
    /// `departure_date` is not validated and does not influence the offer.
    pub async fn recommend(
        &self,
        ctx: &UserContext,
        destination: &str,
        departure_date: &str,
    ) -> Result<Recommendation> {
        let travel_prefs = self.store.get(ctx, TRAVEL_PREFERENCES).await?;
        let classified = PreferenceClassifier::classify(&travel_prefs);

        let now = Local::now().naive_local();
        let recommendation = synthesize(&classified, now, &mut rand::rng());

        match &recommendation {
            Recommendation::Offers(offers) => info!(
                user = %ctx,
                destination,
                departure_date,
                airline = classified.airline.as_deref().unwrap_or_default(),
                count = offers.len(),
                "Generated flight offers"
            ),
            Recommendation::NoAirlinePreference { .. } => info!(
                user = %ctx,
                destination,
                "No airline preference stored, skipping offer generation"
            ),
        }

        Ok(recommendation)
    }
}

/// Build the recommendation for already-classified preferences.
///
/// `now` is the reference wall-clock time the offer's departure and arrival
/// are offset from.
pub fn synthesize<R: Rng>(
    prefs: &ClassifiedPreferences,
    now: NaiveDateTime,
    rng: &mut R,
) -> Recommendation {
    let Some(airline) = prefs.airline.as_deref() else {
        return Recommendation::NoAirlinePreference {
            message: NO_AIRLINE_MESSAGE.to_string(),
        };
    };

    let prefix: String = airline.chars().take(2).collect();
    let flight_number = format!(
        "{}{}",
        prefix.to_uppercase(),
        rng.random_range(FLIGHT_NUMBER_RANGE)
    );

    let departure = now + Duration::hours(rng.random_range(DEPARTURE_OFFSET_HOURS));
    let arrival = now + Duration::hours(rng.random_range(ARRIVAL_OFFSET_HOURS));

    let notes = match prefs.seat.as_deref() {
        Some(seat) => format!("Seat preference '{}' is available.", seat),
        None => "Standard seat options available.".to_string(),
    };

    Recommendation::Offers(vec![FlightOffer {
        airline: airline.to_string(),
        flight_number,
        departure_time: departure.format("%H:%M").to_string(),
        arrival_time: arrival.format("%H:%M").to_string(),
        price: format!("{} EUR", rng.random_range(PRICE_RANGE_EUR)),
        notes,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::InMemoryDocumentStore;
    use chrono::{NaiveDate, NaiveTime};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reference_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn classified(seat: Option<&str>, airline: Option<&str>) -> ClassifiedPreferences {
        ClassifiedPreferences {
            seat: seat.map(String::from),
            airline: airline.map(String::from),
        }
    }

    fn single_offer(recommendation: Recommendation) -> FlightOffer {
        match recommendation {
            Recommendation::Offers(mut offers) => {
                assert_eq!(offers.len(), 1);
                offers.remove(0)
            }
            other => panic!("expected offers, got {:?}", other),
        }
    }

    fn offset_times(range: Range<i64>) -> Vec<String> {
        range
            .map(|h| (reference_time() + Duration::hours(h)).format("%H:%M").to_string())
            .collect()
    }

    #[test]
    fn test_offer_shape() {
        let prefs = classified(None, Some("United Airlines"));

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let offer = single_offer(synthesize(&prefs, reference_time(), &mut rng));

            assert_eq!(offer.airline, "United Airlines");

            let (prefix, digits) = offer.flight_number.split_at(2);
            assert_eq!(prefix, "UN");
            let number: u32 = digits.parse().unwrap();
            assert!((100..=999).contains(&number));

            let amount = offer.price.strip_suffix(" EUR").unwrap();
            let amount: u32 = amount.parse().unwrap();
            assert!((800..=1800).contains(&amount));

            assert!(NaiveTime::parse_from_str(&offer.departure_time, "%H:%M").is_ok());
            assert!(offset_times(2..5).contains(&offer.departure_time));
            assert!(offset_times(10..14).contains(&offer.arrival_time));

            assert_eq!(offer.notes, "Standard seat options available.");
        }
    }

    #[test]
    fn test_notes_mention_seat() {
        let prefs = classified(Some("Window seat"), Some("Delta Airlines"));
        let mut rng = StdRng::seed_from_u64(7);
        let offer = single_offer(synthesize(&prefs, reference_time(), &mut rng));

        assert_eq!(offer.notes, "Seat preference 'Window seat' is available.");
        assert!(offer.flight_number.starts_with("DE"));
    }

    #[test]
    fn test_short_airline_name() {
        let prefs = classified(None, Some("j"));
        let mut rng = StdRng::seed_from_u64(1);
        let offer = single_offer(synthesize(&prefs, reference_time(), &mut rng));

        assert_eq!(offer.flight_number.len(), 4);
        assert!(offer.flight_number.starts_with('J'));
    }

    #[test]
    fn test_missing_airline() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = synthesize(&classified(Some("Aisle"), None), reference_time(), &mut rng);

        match result {
            Recommendation::NoAirlinePreference { message } => {
                assert!(message.contains("No airline preference"));
            }
            other => panic!("expected missing airline, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recommend_reads_travel_preferences() {
        let store = Arc::new(PreferenceStore::new(Arc::new(InMemoryDocumentStore::new())));
        let engine = RecommendationEngine::new(store.clone());
        let ctx = UserContext::new("chris");

        // Other categories are ignored
        store.add(&ctx, "sleep", "Delta Airlines").await.unwrap();
        store.add(&ctx, TRAVEL_PREFERENCES, "Window seat").await.unwrap();

        let result = engine.recommend(&ctx, "Lisbon", "2025-06-01").await.unwrap();
        assert!(matches!(result, Recommendation::NoAirlinePreference { .. }));

        store.add(&ctx, TRAVEL_PREFERENCES, "KLM Royal Dutch").await.unwrap();
        let offer = single_offer(engine.recommend(&ctx, "Lisbon", "2025-06-01").await.unwrap());

        assert_eq!(offer.airline, "KLM Royal Dutch");
        assert!(offer.flight_number.starts_with("KL"));
        assert_eq!(offer.notes, "Seat preference 'Window seat' is available.");

        // Offers are not persisted
        assert_eq!(store.get(&ctx, TRAVEL_PREFERENCES).await.unwrap().len(), 2);
    }
}
