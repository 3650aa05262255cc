//! HTTP server wiring for TapLink (API, visitor route, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for auth, page, tag, stats, and visitor endpoints.
pub mod handlers;
/// In-memory bearer-token sessions.
pub mod sessions;

pub use sessions::{Session, SessionError, SessionManager};
pub use taplink_core::{config, db, models, AppError, Config, Database, DEFAULT_PORT};

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    routing::{delete, get, post, put},
    Router,
};
use hyper::HeaderMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use taplink_core::ComponentRegistry;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub registry: Arc<ComponentRegistry>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, db: Database) -> Self {
        let sessions = Arc::new(SessionManager::default());
        Self::with_sessions(config, db, sessions)
    }

    /// Construct shared application state with a pre-built session manager.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `db`: Open database handle.
    /// - `sessions`: Shared session manager.
    ///
    /// # Returns
    /// A new [`AppState`] wired to the provided session manager.
    pub fn with_sessions(config: Config, db: Database, sessions: Arc<SessionManager>) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            registry: Arc::new(ComponentRegistry::new()),
            sessions,
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
///
/// # Returns
/// Configured `axum::Router`.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    // Security headers applied to every response.
    let mut default_headers = HeaderMap::new();
    default_headers.insert(header::X_CONTENT_TYPE_OPTIONS, "nosniff".parse().unwrap());
    default_headers.insert(header::X_FRAME_OPTIONS, "DENY".parse().unwrap());
    default_headers.insert(
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'"
            .parse()
            .unwrap(),
    );

    // The visitor route is reached from phones scanning physical cards, so
    // CORS stays restrictive by default and opens up only when explicitly
    // requested.
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", cors_port).parse().unwrap(),
                format!("http://127.0.0.1:{}", cors_port).parse().unwrap(),
            ])
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
    };

    Router::new()
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        // Pages
        .route("/api/pages", post(handlers::page::create_page))
        .route("/api/pages", get(handlers::page::list_pages))
        .route("/api/pages/:id", get(handlers::page::get_page))
        .route("/api/pages/:id", put(handlers::page::update_page))
        .route("/api/pages/:id", delete(handlers::page::delete_page))
        .route("/api/pages/:id/blocks", post(handlers::page::apply_block_op))
        // Tags
        .route("/api/tags", post(handlers::tag::create_tag))
        .route("/api/tags", get(handlers::tag::list_tags))
        .route("/api/tags/:id", get(handlers::tag::get_tag))
        .route("/api/tags/:id", put(handlers::tag::update_tag))
        .route("/api/tags/:id", delete(handlers::tag::delete_tag))
        .route("/api/tags/register", post(handlers::tag::register_tag))
        .route("/api/tags/assign", post(handlers::tag::assign_page))
        .route("/api/tags/:id/assignment", delete(handlers::tag::unassign_page))
        // Editor metadata and stats
        .route("/api/components", get(handlers::stats::list_components))
        .route("/api/dashboard", get(handlers::stats::dashboard))
        .route(
            "/api/analytics/summary",
            get(handlers::stats::analytics_summary),
        )
        // Public visitor route
        .route("/t/:tag_uid", get(handlers::visit::visit_tag))
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_content_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    default_headers
                        .get(header::CONTENT_SECURITY_POLICY)
                        .unwrap()
                        .clone(),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    default_headers
                        .get(header::X_CONTENT_TYPE_OPTIONS)
                        .unwrap()
                        .clone(),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    default_headers.get(header::X_FRAME_OPTIONS).unwrap().clone(),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::listener_cors_port;
    use super::resolve_bind_address;
    use std::net::SocketAddr;
    use taplink_core::Config;
    use taplink_core::DEFAULT_PORT;

    fn config_with_port(port: u16) -> Config {
        Config {
            db_path: String::from("/tmp/taplink-db"),
            port,
            base_url: format!("http://localhost:{}", port),
            max_content_size: 1024,
        }
    }

    #[tokio::test]
    async fn listener_cors_port_uses_bound_listener_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener");
        let expected = listener.local_addr().expect("listener addr").port();
        let resolved = listener_cors_port(&listener, DEFAULT_PORT);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn resolve_bind_address_enforces_loopback_when_public_access_disabled() {
        let config = config_with_port(4040);
        unsafe {
            std::env::set_var("BIND", "0.0.0.0:4040");
        }
        let resolved = resolve_bind_address(&config, false);
        assert_eq!(resolved.ip().to_string(), "127.0.0.1");
        assert_eq!(resolved.port(), 4040);
        unsafe {
            std::env::remove_var("BIND");
        }
    }

    #[test]
    fn resolve_bind_address_allows_loopback_and_invalid_fallback() {
        let config = config_with_port(4041);
        let loopback = resolve_bind_address(&config, false);
        assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));

        unsafe {
            std::env::set_var("BIND", "bad:host");
        }
        let fallback = resolve_bind_address(&config, false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
        unsafe {
            std::env::remove_var("BIND");
        }
    }
}
