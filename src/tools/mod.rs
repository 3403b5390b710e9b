//! Tool trait and registry
//!
//! Exposes the preference service to an agent layer as named tools with
//! JSON parameters. The acting user is always passed in explicitly.

use crate::error::MemoryError;
use crate::models::{ToolInput, ToolOutput, UserContext};
use crate::service::PreferenceService;
use crate::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for a single tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    async fn execute(&self, ctx: &UserContext, input: &ToolInput) -> Result<ToolOutput>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Look up `input.tool_name` and run it for `ctx`
    pub async fn execute(&self, ctx: &UserContext, input: &ToolInput) -> Result<ToolOutput> {
        let tool = self
            .get(&input.tool_name)
            .ok_or_else(|| MemoryError::ToolNotFound(input.tool_name.clone()))?;
        tool.execute(ctx, input).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_object_parameters(input: &ToolInput) -> Result<()> {
    if input.parameters.is_object() {
        Ok(())
    } else {
        Err(MemoryError::InvalidToolInput(
            "tool_input must be a JSON object".to_string(),
        ))
    }
}

fn require_str<'a>(input: &'a ToolInput, key: &str) -> Result<&'a str> {
    input
        .parameters
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            MemoryError::InvalidToolInput(format!(
                "Expected string '{}' in {} input",
                key, input.tool_name
            ))
        })
}

fn success<T: Serialize>(data: &T) -> Result<ToolOutput> {
    Ok(ToolOutput {
        success: true,
        data: serde_json::to_value(data)?,
        error: None,
    })
}

pub struct SavePreferenceTool {
    service: Arc<PreferenceService>,
}

#[async_trait::async_trait]
impl Tool for SavePreferenceTool {
    fn name(&self) -> &'static str {
        "save_user_preference"
    }

    fn description(&self) -> &'static str {
        "Save a preference or log entry for the user under a category (e.g. 'travel_preferences', 'sleep', 'workout')"
    }

    async fn execute(&self, ctx: &UserContext, input: &ToolInput) -> Result<ToolOutput> {
        ensure_object_parameters(input)?;
        let category = require_str(input, "category")?;
        let preference = require_str(input, "preference")?;

        let response = self.service.add_preference(ctx, category, preference).await?;
        success(&response)
    }
}

pub struct RetrievePreferencesTool {
    service: Arc<PreferenceService>,
}

#[async_trait::async_trait]
impl Tool for RetrievePreferencesTool {
    fn name(&self) -> &'static str {
        "retrieve_user_preferences"
    }

    fn description(&self) -> &'static str {
        "Retrieve the user's stored preferences for a category"
    }

    async fn execute(&self, ctx: &UserContext, input: &ToolInput) -> Result<ToolOutput> {
        ensure_object_parameters(input)?;
        let category = require_str(input, "category")?;

        let response = self.service.list_preferences(ctx, category).await?;
        success(&response)
    }
}

pub struct FindFlightsTool {
    service: Arc<PreferenceService>,
}

#[async_trait::async_trait]
impl Tool for FindFlightsTool {
    fn name(&self) -> &'static str {
        "find_flights"
    }

    fn description(&self) -> &'static str {
        "Suggest a flight to a destination based on the user's stored airline and seat preferences"
    }

    async fn execute(&self, ctx: &UserContext, input: &ToolInput) -> Result<ToolOutput> {
        ensure_object_parameters(input)?;
        let destination = require_str(input, "destination")?;
        let departure_date = require_str(input, "departure_date")?;

        let response = self
            .service
            .recommend_flight(ctx, destination, departure_date)
            .await?;

        // A missing airline is a normal outcome; the status object carries it.
        success(&response)
    }
}

/// Create a registry with the three preference tools bound to `service`.
pub fn create_default_registry(service: Arc<PreferenceService>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(SavePreferenceTool {
        service: service.clone(),
    }));
    registry.register(Arc::new(RetrievePreferencesTool {
        service: service.clone(),
    }));
    registry.register(Arc::new(FindFlightsTool { service }));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::InMemoryDocumentStore;
    use serde_json::json;

    fn registry() -> ToolRegistry {
        let service = Arc::new(PreferenceService::new(Arc::new(InMemoryDocumentStore::new())));
        create_default_registry(service)
    }

    fn input(tool_name: &str, parameters: serde_json::Value) -> ToolInput {
        ToolInput {
            tool_name: tool_name.to_string(),
            parameters,
        }
    }

    #[test]
    fn test_registry_lists_tools() {
        assert_eq!(
            registry().list(),
            vec!["find_flights", "retrieve_user_preferences", "save_user_preference"]
        );
    }

    #[tokio::test]
    async fn test_save_then_retrieve() {
        let registry = registry();
        let ctx = UserContext::new("chris");

        let saved = registry
            .execute(
                &ctx,
                &input(
                    "save_user_preference",
                    json!({"category": "travel_preferences", "preference": "Delta Airlines"}),
                ),
            )
            .await
            .unwrap();
        assert!(saved.success);
        assert_eq!(saved.data["status"], "success");

        let retrieved = registry
            .execute(
                &ctx,
                &input("retrieve_user_preferences", json!({"category": "travel_preferences"})),
            )
            .await
            .unwrap();
        assert_eq!(retrieved.data["preferences"], json!(["Delta Airlines"]));
        assert_eq!(retrieved.data["count"], 1);

        // Another user sees nothing
        let other = registry
            .execute(
                &UserContext::new("sam"),
                &input("retrieve_user_preferences", json!({"category": "travel_preferences"})),
            )
            .await
            .unwrap();
        assert_eq!(other.data["count"], 0);
    }

    #[tokio::test]
    async fn test_find_flights_without_airline() {
        let registry = registry();
        let output = registry
            .execute(
                &UserContext::new("chris"),
                &input(
                    "find_flights",
                    json!({"destination": "Oslo", "departure_date": "2025-01-10"}),
                ),
            )
            .await
            .unwrap();

        assert_eq!(output.data["status"], "error");
        assert!(output.data["message"]
            .as_str()
            .unwrap()
            .contains("No airline preference"));
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let registry = registry();
        let ctx = UserContext::new("chris");

        let err = registry
            .execute(&ctx, &input("save_user_preference", json!({"category": "sleep"})))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::InvalidToolInput(_)));

        let err = registry
            .execute(&ctx, &input("find_flights", json!("Oslo")))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::InvalidToolInput(_)));

        let err = registry
            .execute(&ctx, &input("book_hotel", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::ToolNotFound(_)));
    }
}
