mod channel;
mod clients;
mod config;
mod geocode;
mod net;
mod provider;
mod service;
mod tencent;
mod types;

use std::sync::Arc;

use channel::build_router;
use config::Config;
use service::ReverseGeocodeService;
use tencent::TencentSearchFactory;
use tracing::info;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let factory = TencentSearchFactory::new(reqwest::Client::new(), config.provider_url.clone());
    let service = Arc::new(ReverseGeocodeService::new(
        factory,
        config.native_enabled,
        config.failure_policy,
    ));
    if !service.is_native_provider_enabled().await {
        info!("Native reverse geocode disabled by configuration");
    }

    let app = build_router(service);

    info!(addr = %config.addr, provider = %config.provider_url, "Running geocode bridge");

    axum::Server::bind(&config.addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
