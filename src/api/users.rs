/// Member-facing account routes
use crate::{
    account::AccountView,
    context::{AppContext, RequestScope},
    error::KumanoResult,
    mailer::InvitationEmail,
    session::{FlashKind, PENDING_INVITEE_ID},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteResponse {
    pub account: AccountView,
    pub email_sent: bool,
}

#[derive(Debug, Serialize)]
pub struct ProviderLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub pending_invitation: bool,
    pub providers: Vec<ProviderLink>,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/users", post(invite))
        .route("/users/signup", get(signup))
}

/// Invite someone by email on behalf of the logged in member
///
/// The placeholder is committed before the email goes out. A failed send is
/// reported with a flash and leaves the invitation in place.
async fn invite(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(req): Json<InviteRequest>,
) -> KumanoResult<(StatusCode, CookieJar, Json<InviteResponse>)> {
    let mut scope = RequestScope::begin(&ctx, &jar).await?;
    let sponsor = scope.require_account().await?;

    let placeholder = ctx
        .invitations
        .issue_placeholder(&mut scope.tx, &sponsor, &req.email)
        .await?;
    let jar = scope.finish(jar).await?;

    let email = InvitationEmail {
        recipient_email: req.email.trim().to_string(),
        sponsor_id: sponsor.id.clone(),
        sponsor_name: sponsor.name.clone().unwrap_or_default(),
        sponsor_nickname: sponsor.nickname.clone().unwrap_or_default(),
        invitation_url: ctx.config.invitation_url(&placeholder.invitation_token),
    };
    let sent = ctx.mailer.send_invitation_email(&email).await;

    let mut scope = RequestScope::begin(&ctx, &jar).await?;
    let email_sent = match sent {
        Ok(()) => {
            let message = scope
                .translator
                .t_with("users.invitation.sent", &[email.recipient_email.as_str()]);
            scope.session.flash(FlashKind::Success, message)?;
            true
        }
        Err(e) => {
            tracing::error!(
                "users: invitation email to {} failed: {}",
                email.recipient_email,
                e
            );
            let message = scope
                .translator
                .t_with("users.invitation.mail_failed", &[email.recipient_email.as_str()]);
            scope.session.flash(FlashKind::Danger, message)?;
            false
        }
    };
    let jar = scope.finish(jar).await?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(InviteResponse {
            account: AccountView::from(&placeholder),
            email_sent,
        }),
    ))
}

/// Where a redeemed invitation lands: pick a provider to finish signing up
async fn signup(
    State(ctx): State<AppContext>,
    jar: CookieJar,
) -> KumanoResult<(CookieJar, Json<SignupResponse>)> {
    let scope = RequestScope::begin(&ctx, &jar).await?;
    let pending_invitation = scope.session.get::<String>(PENDING_INVITEE_ID).is_some();
    let jar = scope.finish(jar).await?;

    let providers = ctx
        .providers
        .names()
        .into_iter()
        .map(|name| ProviderLink {
            url: format!("/auth/{}", name),
            name,
        })
        .collect();

    Ok((
        jar,
        Json(SignupResponse {
            pending_invitation,
            providers,
        }),
    ))
}
