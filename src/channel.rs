use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::Value;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;

use crate::{net::response::Result, provider::ProviderFactory, service::ReverseGeocodeService};

pub const CHANNEL_NAME: &str = "tencent_map_service";

pub fn build_router<F>(service: Arc<ReverseGeocodeService<F>>) -> Router
where
    F: ProviderFactory + 'static,
{
    Router::new()
        .route(&format!("/{CHANNEL_NAME}/:method"), post(method_call::<F>))
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn method_call<F>(
    State(service): State<Arc<ReverseGeocodeService<F>>>,
    Path(method): Path<String>,
    body: Bytes,
) -> Result<Response>
where
    F: ProviderFactory + 'static,
{
    // an unreadable body is treated like missing arguments
    let arguments = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let (completion, reply) = oneshot::channel();
    service.handle_method_call(&method, arguments, completion);
    Ok(reply.await?.into_response())
}
