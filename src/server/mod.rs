mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::{API, DynAPI};
use crate::server::handlers::orders;

pub async fn serve<T: API + Sync + Send + 'static>(api: T) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/orders", get(orders::index))
        .route("/orders/quotation", post(orders::request_quotation))
        .route("/orders/:quote_id/quotation", get(orders::poll_quotation))
        .route("/orders/:quote_id/booking", post(orders::book))
        .route("/orders/:quote_id", get(orders::find))
        .layer(Extension(api));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
