//! Hydroponic Greenhouse Management - timeline CLI
//!
//! Fetches harvests and the stage catalog from the greenhouse API and prints
//! each harvest's projected stage timeline as JSON.
//!
//! Usage: `hgm-timeline [HARVEST_ID]`

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hgm_client::config::{AuthConfig, Config};
use hgm_client::services::TimelineService;
use hgm_client::{ClientError, GreenhouseClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    let language = config.display.language();

    tracing::info!("Starting hgm-timeline");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Greenhouse API: {}", config.api.base_url);

    let client = GreenhouseClient::new(&config.api)?;
    authenticate(&client, &config.auth).await?;

    let service = TimelineService::new(client, language);
    let now = Utc::now();

    let result = match std::env::args().nth(1) {
        Some(harvest_id) => service
            .harvest_timeline(&harvest_id, now)
            .await
            .map(|view| vec![view]),
        None => service.all_timelines(now).await,
    };

    let views = match result {
        Ok(views) => views,
        Err(e) => {
            tracing::error!(code = e.code(), "{}", e.localized(language));
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hgm_timeline=info,hgm_client=info,reqwest=warn".into());
    let json = std::env::var("HGM_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays valid JSON
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Use a configured token, or sign in with configured credentials
async fn authenticate(client: &GreenhouseClient, auth: &AuthConfig) -> anyhow::Result<()> {
    if let Some(token) = auth.token.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("Using configured API token");
        client.use_token(token).await;
        return Ok(());
    }

    match (auth.email.as_deref(), auth.password.as_deref()) {
        (Some(email), Some(password)) => client.login(email, password).await.map_err(|e| {
            tracing::error!(code = e.code(), "{}", e.message_en());
            anyhow::Error::from(e)
        }),
        _ => Err(ClientError::NotAuthenticated).context(
            "No credentials configured: set HGM__AUTH__TOKEN, or HGM__AUTH__EMAIL and HGM__AUTH__PASSWORD",
        ),
    }
}
