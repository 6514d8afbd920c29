//! HTTP API guarded by a validator declared in YAML
//!
//! Run with `RUST_LOG=fieldguard=debug,tower_http=debug cargo run --example validated_api`
//! then try:
//!
//! ```text
//! curl -i -X POST localhost:3000/orders -H 'content-type: application/json' \
//!      -d '{"customer": {"email": "ada@example.com"}, "items": [{"sku": "A1"}], "qty": 2}'
//! curl -i -X POST localhost:3000/orders -H 'content-type: application/json' \
//!      -d '{"customer": {"email": "nope"}, "items": [], "qty": "2"}'
//! ```

use axum::{
    Json, Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use fieldguard::prelude::*;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const ORDER_RULES: &str = include_str!("orders.yaml");

/// Stands in for an authentication layer attaching caller information
async fn attach_client(mut request: Request, next: Next) -> Response {
    let client = request
        .headers()
        .get("x-client-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();
    request
        .extensions_mut()
        .insert(ContextAttributes::new().with("client", client));
    next.run(request).await
}

async fn create_order(Json(order): Json<Value>) -> Json<Value> {
    Json(json!({ "status": "accepted", "order": order }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let validator = ValidatorConfig::from_yaml_str(ORDER_RULES)?.build_validator()?;
    tracing::info!(rules = validator.rules().len(), "order validator ready");

    // Layers run bottom-up: context is attached before validation
    let app = Router::new()
        .route("/orders", post(create_order))
        .layer(middleware::from_fn_with_state(
            RequestValidation::new(validator),
            validate_request,
        ))
        .layer(middleware::from_fn(attach_client))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
