use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use travel_memory::{
    api::{start_server, ApiState},
    config::AppConfig,
    state::build_store,
    tools::create_default_registry,
    PreferenceService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    info!("Travel Preference Memory - API Server");
    info!("Port: {}", config.port);

    // Create components
    let store = build_store(&config)?;
    let service = Arc::new(PreferenceService::new(store));
    let tools = Arc::new(create_default_registry(service.clone()));

    let state = ApiState {
        service,
        tools,
        default_user_id: config.default_user_id.clone(),
    };

    info!("Preference service initialized");

    start_server(state, config.port).await?;

    Ok(())
}
