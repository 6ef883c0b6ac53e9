pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod validators;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;

/// Assemble every route with its middleware
pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .nest("/upload/pictures", upload_routes(config))
        // Global middleware
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{authentications, songs, users};

    Router::new()
        .route("/users", post(users::post_user))
        .route("/users/:id", get(users::get_user))
        .route(
            "/authentications",
            post(authentications::post_authentication)
                .put(authentications::put_authentication)
                .delete(authentications::delete_authentication),
        )
        .route("/songs", post(songs::post_song).get(songs::get_songs))
        .route(
            "/songs/:id",
            get(songs::get_song).put(songs::put_song).delete(songs::delete_song),
        )
}

/// Uploads land in the same folder the fallback serves from
fn upload_routes(config: &AppConfig) -> Router<AppState> {
    use handlers::public::uploads;

    Router::new()
        .route(
            "/",
            post(uploads::post_picture).layer(DefaultBodyLimit::max(config.uploads.max_bytes)),
        )
        .fallback_service(ServeDir::new(&config.uploads.dir))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{collaborations, exports, playlists};

    Router::new()
        .route("/playlists", post(playlists::post_playlist).get(playlists::get_playlists))
        .route("/playlists/:id", delete(playlists::delete_playlist))
        .route(
            "/playlists/:id/songs",
            post(playlists::post_playlist_song)
                .get(playlists::get_playlist_songs)
                .delete(playlists::delete_playlist_song),
        )
        .route(
            "/collaborations",
            post(collaborations::post_collaboration).delete(collaborations::delete_collaboration),
        )
        .route("/export/playlists/:playlist_id", post(exports::post_export_playlist))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::jwt_auth_middleware,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(allowed).allow_methods(Any).allow_headers(Any)
}
