//! Caller-facing preference service
//!
//! The three operations an agent or HTTP layer needs. Expected conditions
//! (unknown user, missing airline) come back as status objects; only storage
//! faults are returned as `Err`.

use crate::memory::PreferenceStore;
use crate::models::{FlightOffer, UserContext};
use crate::recommendation::{Recommendation, RecommendationEngine};
use crate::state::DocumentStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddPreferenceResponse {
    pub status: Status,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPreferencesResponse {
    pub status: Status,
    pub preferences: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FlightSearchResponse {
    Success { flights: Vec<FlightOffer> },
    Error { message: String },
}

impl FlightSearchResponse {
    pub fn status(&self) -> Status {
        match self {
            FlightSearchResponse::Success { .. } => Status::Success,
            FlightSearchResponse::Error { .. } => Status::Error,
        }
    }
}

impl From<Recommendation> for FlightSearchResponse {
    fn from(recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::Offers(flights) => FlightSearchResponse::Success { flights },
            Recommendation::NoAirlinePreference { message } => {
                FlightSearchResponse::Error { message }
            }
        }
    }
}

/// Preference memory plus recommendations over a single injected store
pub struct PreferenceService {
    preferences: Arc<PreferenceStore>,
    engine: RecommendationEngine,
}

impl PreferenceService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let preferences = Arc::new(PreferenceStore::new(store));
        let engine = RecommendationEngine::new(preferences.clone());
        Self {
            preferences,
            engine,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.preferences.backend_name()
    }

    pub async fn add_preference(
        &self,
        ctx: &UserContext,
        category: &str,
        text: &str,
    ) -> Result<AddPreferenceResponse> {
        self.preferences.add(ctx, category, text).await?;
        info!(user = %ctx, category, "Preference saved");

        Ok(AddPreferenceResponse {
            status: Status::Success,
            message: format!("Preference saved in category '{}'.", category),
        })
    }

    pub async fn list_preferences(
        &self,
        ctx: &UserContext,
        category: &str,
    ) -> Result<ListPreferencesResponse> {
        let preferences = self.preferences.get(ctx, category).await?;

        Ok(ListPreferencesResponse {
            status: Status::Success,
            count: preferences.len(),
            preferences,
        })
    }

    pub async fn recommend_flight(
        &self,
        ctx: &UserContext,
        destination: &str,
        departure_date: &str,
    ) -> Result<FlightSearchResponse> {
        let recommendation = self
            .engine
            .recommend(ctx, destination, departure_date)
            .await?;
        Ok(recommendation.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TRAVEL_PREFERENCES;
    use crate::state::InMemoryDocumentStore;
    use serde_json::json;

    fn new_service() -> PreferenceService {
        PreferenceService::new(Arc::new(InMemoryDocumentStore::new()))
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let service = new_service();
        let ctx = UserContext::new("chris");

        let added = service.add_preference(&ctx, "sleep", "8 hours").await.unwrap();
        assert_eq!(
            serde_json::to_value(&added).unwrap(),
            json!({"status": "success", "message": "Preference saved in category 'sleep'."})
        );

        service.add_preference(&ctx, "sleep", "8 hours").await.unwrap();
        let listed = service.list_preferences(&ctx, "sleep").await.unwrap();
        assert_eq!(
            serde_json::to_value(&listed).unwrap(),
            json!({"status": "success", "preferences": ["8 hours"], "count": 1})
        );
    }

    #[tokio::test]
    async fn test_list_unknown_user() {
        let service = new_service();
        let listed = service
            .list_preferences(&UserContext::new("ghost"), "sleep")
            .await
            .unwrap();
        assert_eq!(listed.count, 0);
        assert!(listed.preferences.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_without_airline() {
        let service = new_service();
        let ctx = UserContext::new("chris");
        service
            .add_preference(&ctx, TRAVEL_PREFERENCES, "Window seat")
            .await
            .unwrap();

        let response = service.recommend_flight(&ctx, "Rome", "2025-07-01").await.unwrap();
        assert_eq!(response.status(), Status::Error);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert!(value["message"].as_str().unwrap().contains("airline preference"));
        assert!(value.get("flights").is_none());
    }

    #[tokio::test]
    async fn test_recommend_with_airline() {
        let service = new_service();
        let ctx = UserContext::new("chris");
        service
            .add_preference(&ctx, TRAVEL_PREFERENCES, "United Airlines")
            .await
            .unwrap();

        let response = service.recommend_flight(&ctx, "Rome", "2025-07-01").await.unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "success");
        let flights = value["flights"].as_array().unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0]["airline"], "United Airlines");
        assert!(flights[0]["flight_number"].as_str().unwrap().starts_with("UN"));
        assert!(flights[0]["price"].as_str().unwrap().ends_with(" EUR"));
    }
}
