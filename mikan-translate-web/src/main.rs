use mikan_translate::GoogleTranslateProvider;
use mikan_translate_web::{AppState, RelayConfig, app};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .init();

    let config = RelayConfig::from_env()?;
    let translator = GoogleTranslateProvider::new(config.api_key.clone())?;
    let state = AppState {
        translator: Arc::new(translator),
        shared_token: config.shared_token.clone(),
        source_locale: config.source_locale.clone(),
    };

    info!("🍊 Starting mikan-translate relay");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("🚀 Relay listening at http://{}", config.bind_addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
