use std::sync::Arc;
use std::time::Duration;

use dm_narrator::{
    AppError, NarrationOptions, Narrator, OpenAiProvider, Settings, logging,
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    logging::init(&settings)?;

    let provider = OpenAiProvider::new(&settings).inspect_err(|e| {
        log::error!("Failed to create the model provider: {e}");
    })?;
    let narrator = Narrator::new(Arc::new(provider), NarrationOptions::from(&settings));
    let state = AppState::new(Arc::new(narrator))
        .with_media_timeout(Duration::from_secs(settings.media_timeout_secs));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    log::info!(
        "DM narrator listening on {} (model {})",
        settings.bind_address,
        settings.model
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("DM narrator exit: {}", chrono::Local::now());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e:#?}");
        std::future::pending::<()>().await;
    }
}
