use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use log::info;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use donation_chat_service::integration::Config;
use donation_chat_service::state::AppState;
use donation_chat_service::{contact, event, message, thread, unread, user};

#[tokio::main]
async fn main() {
    let config = Config::default();
    let state = AppState::init(&config);

    let api = Router::new()
        .merge(thread::api(state.clone()))
        .merge(message::api(state.clone()))
        .merge(unread::api(state.clone()))
        .merge(contact::api(state.clone()))
        .merge(user::api(state.clone()));

    let app = Router::new()
        .nest("/api", api)
        .merge(event::endpoints(state))
        .layer(axum::middleware::from_fn(user::middleware::authenticate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(config.env.allow_origin())
                        .allow_methods(config.env.allow_methods())
                        .allow_headers(config.env.allow_headers()),
                ),
        )
        .route("/health", get(health));

    let addr = config.env.addr();
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}

async fn health() -> StatusCode {
    StatusCode::OK
}
