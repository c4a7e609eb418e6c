//! HTTP router.
//!
//! Pages at `/` and `/history`, JSON endpoints nested under `/api/`.
//! Every response passes through request tracing and gets
//! `X-Content-Type-Options: nosniff`.

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::page;
use crate::api::types::ApiContext;

/// Build the full application router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/options", get(endpoints::options::list))
        .route("/predict", post(endpoints::predict::predict))
        .route("/report", post(endpoints::predict::report))
        .route("/history", get(endpoints::history::list))
        .route(
            "/history/top-diseases",
            get(endpoints::history::top_diseases),
        );

    Router::new()
        .route("/", get(page::index))
        .route("/history", get(endpoints::history::page))
        .nest("/api", api)
        .with_state(ctx)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}
