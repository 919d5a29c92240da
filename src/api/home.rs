/// Landing page and health check
use crate::{
    account::AccountView,
    context::{AppContext, RequestScope},
    db,
    error::KumanoResult,
    session::Flash,
};
use axum::{extract::State, response::Json, routing::get, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub account: Option<AccountView>,
    pub flashes: Vec<Flash>,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
}

/// Current account plus any queued flash messages, which are drained
async fn home(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> KumanoResult<(CookieJar, Json<HomeResponse>)> {
    let mut scope = RequestScope::begin(&ctx, &jar).await?;

    let account = scope.current_account().await?.as_ref().map(AccountView::from);
    let flashes = scope.session.take_flashes();

    let jar = scope.finish(jar).await?;
    Ok((jar, Json(HomeResponse { account, flashes })))
}

async fn health(State(ctx): State<AppContext>) -> KumanoResult<Json<serde_json::Value>> {
    db::test_connection(&ctx.db).await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
