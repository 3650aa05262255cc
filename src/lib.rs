//! Root crate facade for the TapLink server.

pub use taplink_server::{
    config, create_app, db, error, handlers, models, resolve_bind_address, serve_router, sessions,
    AppError, AppState, Config, Database, SessionManager,
};
