/// HTTP routes and handlers
pub mod auth;
pub mod home;
pub mod users;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(home::routes())
        .merge(auth::routes())
        .merge(users::routes())
}
