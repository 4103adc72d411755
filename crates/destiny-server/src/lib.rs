pub mod dispatch;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use destiny_core::config::Config;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf, config: Config) -> Router {
    let assets = ServeDir::new(config.assets_path(&root));
    let app_state = state::AppState::new(root, config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Record stores
        .route(
            "/api/responses",
            get(routes::responses::list_responses).post(routes::responses::create_response),
        )
        .route("/api/save-result", post(routes::results::save_result))
        // Characters
        .route("/api/characters", get(routes::characters::list_characters))
        .route(
            "/api/characters/{id}",
            get(routes::characters::get_character),
        )
        // Ritual sessions
        .route("/api/rituals", post(routes::rituals::create_ritual))
        .route(
            "/api/rituals/{id}",
            get(routes::rituals::get_ritual)
                .patch(routes::rituals::update_ritual)
                .delete(routes::rituals::delete_ritual),
        )
        .route(
            "/api/rituals/{id}/begin",
            post(routes::rituals::begin_ritual),
        )
        .route(
            "/api/rituals/{id}/advance",
            post(routes::rituals::advance_ritual),
        )
        .route(
            "/api/rituals/{id}/retreat",
            post(routes::rituals::retreat_ritual),
        )
        .route(
            "/api/rituals/{id}/restart",
            post(routes::rituals::restart_ritual),
        )
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the server on `port`, loading `destiny.yaml` from `root`.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let config = Config::load(&root)?;
    let app = build_router(root, config);

    tracing::info!("destiny server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
