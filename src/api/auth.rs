/// Login, logout and invitation redemption
use crate::{
    context::{AppContext, RequestScope},
    error::{ErrorResponse, KumanoError, KumanoResult},
    reconcile::Reconciliation,
    session::{FlashKind, OAUTH_STATE},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{delete, get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/auth", delete(logout))
        .route("/auth/logout", post(logout))
        .route("/auth/invitation/:token", get(redeem_invitation))
        .route("/auth/:provider", get(begin_login))
        .route("/auth/:provider/callback", get(login_callback))
}

/// Start the provider handshake
async fn begin_login(
    State(ctx): State<AppContext>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> KumanoResult<(CookieJar, Redirect)> {
    let provider = ctx
        .providers
        .get(&provider)
        .ok_or_else(|| KumanoError::NotFound(format!("Unknown identity provider: {}", provider)))?;

    let mut scope = RequestScope::begin(&ctx, &jar).await?;
    let state = Uuid::new_v4().simple().to_string();
    scope.session.set(OAUTH_STATE, &state)?;
    let jar = scope.finish(jar).await?;

    tracing::debug!("auth: redirecting to {}", provider.name());
    Ok((jar, Redirect::to(&provider.authorize_url(&state))))
}

/// Finish the handshake and reconcile the identity with our accounts
async fn login_callback(
    State(ctx): State<AppContext>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> KumanoResult<(CookieJar, Redirect)> {
    let provider = ctx
        .providers
        .get(&provider)
        .ok_or_else(|| KumanoError::NotFound(format!("Unknown identity provider: {}", provider)))?;

    if let Some(error) = params.error {
        return Err(KumanoError::Authentication(format!(
            "{} refused the login: {}",
            provider.name(),
            error
        )));
    }

    let (Some(code), Some(state)) = (params.code, params.state) else {
        return Err(KumanoError::Authentication(
            "Missing code or state in callback".to_string(),
        ));
    };

    // The provider round trip happens before any transaction is open
    let expected = RequestScope::peek_session(&ctx, &jar)
        .await?
        .and_then(|session| session.get::<String>(OAUTH_STATE));
    if expected.as_deref() != Some(state.as_str()) {
        tracing::warn!("auth: {} callback state mismatch", provider.name());
        return Err(KumanoError::Authentication(
            "Login state did not match".to_string(),
        ));
    }

    let identity = provider.complete(&code, &state).await?;

    let mut scope = RequestScope::begin(&ctx, &jar).await?;
    // Single use: a concurrent callback may have spent it meanwhile
    if scope.session.take::<String>(OAUTH_STATE).as_deref() != Some(state.as_str()) {
        tracing::warn!("auth: {} callback state already used", provider.name());
        return Err(KumanoError::Authentication(
            "Login state did not match".to_string(),
        ));
    }

    match ctx.reconciler.reconcile(&mut scope, &identity).await? {
        Reconciliation::ReturningMember { .. } | Reconciliation::Duplicate => {}
        Reconciliation::Activated {
            nickname_notice, ..
        } => {
            if let Some(notice) = nickname_notice {
                let message = scope.translator.t_with(
                    "auth.nickname.taken",
                    &[notice.requested.as_str(), notice.assigned.as_str()],
                );
                scope.session.flash(FlashKind::Info, message)?;
            }
        }
        Reconciliation::Rejected => {
            let message = scope.translator.t("auth.callback.failure");
            scope.session.flash(FlashKind::Danger, message)?;
        }
        Reconciliation::Invalid { errors, .. } => {
            return Err(KumanoError::Validation(errors));
        }
    }

    let jar = scope.finish(jar).await?;
    Ok((jar, Redirect::to("/")))
}

/// Mark the invitation's placeholder as the session's pending invitee
async fn redeem_invitation(
    State(ctx): State<AppContext>,
    Path(token): Path<String>,
    jar: CookieJar,
) -> KumanoResult<Response> {
    let mut scope = RequestScope::begin(&ctx, &jar).await?;

    match ctx
        .invitations
        .redeem(&mut scope.tx, &mut scope.session, &token)
        .await
    {
        Ok(_) => {
            let jar = scope.finish(jar).await?;
            Ok((jar, Redirect::to("/users/signup")).into_response())
        }
        Err(KumanoError::InvitationNotFound) => {
            let message = scope.translator.t("auth.invitation.failure");
            scope.session.flash(FlashKind::Danger, message.clone())?;
            let jar = scope.finish(jar).await?;

            let body = Json(ErrorResponse {
                error: "InvitationInvalid".to_string(),
                message,
                errors: None,
            });
            Ok((StatusCode::FORBIDDEN, jar, body).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Clear the session
async fn logout(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> KumanoResult<(CookieJar, Redirect)> {
    let mut scope = RequestScope::begin(&ctx, &jar).await?;

    if let Some(id) = scope.session.current_account_id() {
        tracing::info!("auth: account {} logged out", id);
    }
    scope.session.clear();
    scope.session.regenerate();
    let message = scope.translator.t("auth.destroy.success");
    scope.session.flash(FlashKind::Success, message)?;

    let jar = scope.finish(jar).await?;
    Ok((jar, Redirect::to("/")))
}
