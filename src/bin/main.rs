use tracing::info;
use tracing_subscriber::EnvFilter;
use travel_memory::{
    config::AppConfig,
    service::FlightSearchResponse,
    state::build_store,
    PreferenceService, UserContext, TRAVEL_PREFERENCES,
};

/// Seed a user's travel preferences and print a flight recommendation.
///
/// Usage: demo [destination] [departure_date]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let mut args = std::env::args().skip(1);
    let destination = args.next().unwrap_or_else(|| "Tokyo".to_string());
    let departure_date = args.next().unwrap_or_else(|| "2025-10-01".to_string());

    let service = PreferenceService::new(build_store(&config)?);
    let ctx = UserContext::new(config.default_user_id.clone());

    info!(user = %ctx, "Travel preference demo starting");

    for pref in ["Delta Airlines", "Window seat"] {
        service.add_preference(&ctx, TRAVEL_PREFERENCES, pref).await?;
    }

    let listed = service.list_preferences(&ctx, TRAVEL_PREFERENCES).await?;
    println!("\n=== STORED PREFERENCES ({}) ===", listed.count);
    for (i, pref) in listed.preferences.iter().enumerate() {
        println!("  {}: {}", i + 1, pref);
    }

    match service
        .recommend_flight(&ctx, &destination, &departure_date)
        .await?
    {
        FlightSearchResponse::Success { flights } => {
            println!("\n=== FLIGHTS TO {} ON {} ===", destination, departure_date);
            for flight in &flights {
                println!("{}", serde_json::to_string_pretty(flight)?);
            }
        }
        FlightSearchResponse::Error { message } => {
            println!("\nNo recommendation: {}", message);
        }
    }

    Ok(())
}
