/// End-to-end tests for login, invitation and logout over the HTTP router
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::Utc;
use kumano::{
    config::ServerConfig,
    context::AppContext,
    db::account::{self, Account, Lifecycle},
    error::KumanoResult,
    identity::{IdentityProvider, VerifiedIdentity},
    server::build_router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Provider that trusts the code it is handed: `<user id>.<nickname>`
struct FakeProvider;

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn authorize_url(&self, state: &str) -> String {
        format!("https://fake.example/authorize?state={}", state)
    }

    async fn complete(&self, code: &str, state: &str) -> KumanoResult<VerifiedIdentity> {
        let (id, nickname) = code.split_once('.').unwrap_or((code, code));
        Ok(VerifiedIdentity {
            provider: "fake".to_string(),
            provider_user_id: id.to_string(),
            display_name: format!("{} Name", nickname),
            avatar_url: format!("https://avatars.example.com/{}.png", id),
            nickname: nickname.to_string(),
            callback_nonce: Some(state.to_string()),
        })
    }
}

struct Site {
    _dir: TempDir,
    ctx: AppContext,
    app: Router,
}

async fn site() -> Site {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig::for_tests(dir.path().join("flow.sqlite"));
    let mut ctx = AppContext::new(config).await.unwrap();
    ctx.providers.register(Arc::new(FakeProvider));

    let mut sponsor = Account::placeholder(Some("sponsor@example.com".to_string()), None);
    sponsor.lifecycle = Lifecycle::Active;
    sponsor.name = Some("Sponsor Name".to_string());
    sponsor.nickname = Some("sponsor".to_string());
    sponsor.avatar_url = Some("https://avatars.example.com/sponsor.png".to_string());
    sponsor.provider = Some("fake".to_string());
    sponsor.provider_id = Some("sponsor".to_string());
    sponsor.score = 40;
    sponsor.sponsorships_count = 1;
    sponsor.signed_up_at = Some(Utc::now());
    sponsor.last_login_at = Some(Utc::now());
    let mut conn = ctx.db.acquire().await.unwrap();
    account::save(&mut conn, &sponsor).await.unwrap();
    drop(conn);

    let app = build_router(ctx.clone());
    Site {
        _dir: dir,
        ctx,
        app,
    }
}

/// A browser: remembers the session cookie between requests
struct Browser {
    app: Router,
    cookie: Option<String>,
}

impl Browser {
    fn new(site: &Site) -> Self {
        Self {
            app: site.app.clone(),
            cookie: None,
        }
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let set_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("_kumano_session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        if set_cookie.is_some() {
            self.cookie = set_cookie;
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Method::GET, uri, None).await
    }

    /// Run the whole provider round trip
    async fn login(&mut self, code: &str) -> Response {
        let state = self.begin_login().await;
        self.get(&format!("/auth/fake/callback?code={}&state={}", code, state))
            .await
    }

    /// Start the handshake and return the state the provider would echo back
    async fn begin_login(&mut self) -> String {
        let response = self.get("/auth/fake").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        location(&response)
            .split("state=")
            .nth(1)
            .unwrap()
            .to_string()
    }

    async fn home(&mut self) -> Value {
        let response = self.get("/").await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn stored(ctx: &AppContext, nickname: &str) -> Account {
    let mut conn = ctx.db.acquire().await.unwrap();
    account::find(&mut conn, account::AccountPredicate::Nickname(nickname))
        .await
        .unwrap()
        .unwrap()
}

async fn account_count(ctx: &AppContext) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM account")
        .fetch_one(&ctx.db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_invited_friend_signs_up() {
    let site = site().await;

    let mut sponsor = Browser::new(&site);
    let response = sponsor.login("sponsor.sponsor").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(sponsor.home().await["account"]["nickname"], "sponsor");

    let response = sponsor
        .send(
            Method::POST,
            "/users",
            Some(json!({ "email": "friend@example.com" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let invited = body_json(response).await;
    assert_eq!(invited["emailSent"], true);
    assert_eq!(invited["account"]["score"], 0);

    let token: String =
        sqlx::query_scalar("SELECT invitation_token FROM account WHERE email = 'friend@example.com'")
            .fetch_one(&site.ctx.db)
            .await
            .unwrap();

    let mut friend = Browser::new(&site);
    let response = friend.get(&format!("/auth/invitation/{}", token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users/signup");

    let signup = body_json(friend.get("/users/signup").await).await;
    assert_eq!(signup["pendingInvitation"], true);
    assert_eq!(signup["providers"][0]["url"], "/auth/fake");

    // The friend's provider nickname collides with the sponsor's
    let anonymous_cookie = friend.cookie.clone();
    let response = friend.login("friend.sponsor").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(friend.cookie.is_some());
    assert_ne!(friend.cookie, anonymous_cookie);

    let home = friend.home().await;
    let nickname = home["account"]["nickname"].as_str().unwrap();
    assert!(nickname.starts_with("sponsor"));
    assert_ne!(nickname, "sponsor");
    assert_eq!(home["account"]["score"], 30);
    assert_eq!(home["account"]["sponsorId"], invited["account"]["sponsorId"]);
    assert_eq!(home["flashes"][0]["kind"], "info");
    assert!(home["flashes"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("@sponsor was already taken"));

    // Single use
    let response = Browser::new(&site)
        .get(&format!("/auth/invitation/{}", token))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(stored(&site.ctx, "sponsor").await.sponsorships_count, 0);
    assert_eq!(account_count(&site.ctx).await, 2);
}

#[tokio::test]
async fn test_invitations_are_limited_by_allowance() {
    let site = site().await;
    let mut sponsor = Browser::new(&site);
    sponsor.login("sponsor.sponsor").await;

    let response = sponsor
        .send(Method::POST, "/users", Some(json!({ "email": "one@example.com" })))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = sponsor
        .send(Method::POST, "/users", Some(json!({ "email": "two@example.com" })))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(account_count(&site.ctx).await, 2);
}

#[tokio::test]
async fn test_member_failing_validation_is_not_logged_in() {
    let site = site().await;

    let before = Utc::now() - chrono::Duration::days(3);
    let mut clash = Account::placeholder(Some("SPONSOR@example.com".to_string()), None);
    clash.lifecycle = Lifecycle::Active;
    clash.name = Some("Clash Name".to_string());
    clash.nickname = Some("clash".to_string());
    clash.avatar_url = Some("https://avatars.example.com/clash.png".to_string());
    clash.provider = Some("fake".to_string());
    clash.provider_id = Some("clash".to_string());
    clash.score = 25;
    clash.signed_up_at = Some(before);
    clash.last_login_at = Some(before);
    let mut conn = site.ctx.db.acquire().await.unwrap();
    account::save(&mut conn, &clash).await.unwrap();
    drop(conn);

    let mut member = Browser::new(&site);
    let response = member.login("clash.clash").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["errors"]["email"].is_array());

    let after = stored(&site.ctx, "clash").await;
    assert_eq!(after.score, 25);
    assert_eq!(
        after.last_login_at.map(|t| t.timestamp()),
        Some(before.timestamp())
    );
    assert!(member.home().await["account"].is_null());
}

#[tokio::test]
async fn test_callback_cannot_be_replayed() {
    let site = site().await;
    let mut sponsor = Browser::new(&site);

    let state = sponsor.begin_login().await;
    let callback = format!("/auth/fake/callback?code=sponsor.sponsor&state={}", state);
    assert_eq!(sponsor.get(&callback).await.status(), StatusCode::SEE_OTHER);
    assert_eq!(sponsor.get(&callback).await.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(stored(&site.ctx, "sponsor").await.score, 41);
    assert!(!sponsor.home().await["account"].is_null());
}

#[tokio::test]
async fn test_unknown_invitation_is_forbidden_with_flash() {
    let site = site().await;
    let mut visitor = Browser::new(&site);

    let response = visitor.get("/auth/invitation/not-a-token").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "InvitationInvalid");

    let home = visitor.home().await;
    assert_eq!(home["flashes"][0]["kind"], "danger");
}

#[tokio::test]
async fn test_stranger_is_turned_away() {
    let site = site().await;
    let mut stranger = Browser::new(&site);

    let response = stranger.login("stranger.stranger").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let home = stranger.home().await;
    assert!(home["account"].is_null());
    assert_eq!(home["flashes"][0]["kind"], "danger");
    assert_eq!(account_count(&site.ctx).await, 1);
}

#[tokio::test]
async fn test_callback_state_must_match() {
    let site = site().await;

    let mut visitor = Browser::new(&site);
    visitor.get("/auth/fake").await;
    let response = visitor
        .get("/auth/fake/callback?code=sponsor.sponsor&state=forged")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = Browser::new(&site)
        .get("/auth/fake/callback?code=sponsor.sponsor&state=forged")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(visitor.home().await["account"].is_null());
}

#[tokio::test]
async fn test_invite_requires_login() {
    let site = site().await;

    let response = Browser::new(&site)
        .send(
            Method::POST,
            "/users",
            Some(json!({ "email": "friend@example.com" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(account_count(&site.ctx).await, 1);
}

#[tokio::test]
async fn test_invite_with_blank_email_is_unprocessable() {
    let site = site().await;
    let mut sponsor = Browser::new(&site);
    sponsor.login("sponsor.sponsor").await;

    let response = sponsor
        .send(Method::POST, "/users", Some(json!({ "email": "" })))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["errors"]["email"].is_array());
    assert_eq!(account_count(&site.ctx).await, 1);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let site = site().await;
    let mut sponsor = Browser::new(&site);
    sponsor.login("sponsor.sponsor").await;
    assert!(!sponsor.home().await["account"].is_null());

    let response = sponsor.send(Method::DELETE, "/auth", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let home = sponsor.home().await;
    assert!(home["account"].is_null());
    assert_eq!(home["flashes"][0]["kind"], "success");
}

#[tokio::test]
async fn test_unknown_provider_and_health() {
    let site = site().await;
    let mut visitor = Browser::new(&site);

    assert_eq!(visitor.get("/auth/nope").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(visitor.get("/health").await.status(), StatusCode::OK);
}
