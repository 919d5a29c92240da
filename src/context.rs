/// Application context and per-request scope
use crate::{
    account::RandomSuffixAllocator,
    config::ServerConfig,
    db::{
        self,
        account::{self, Account, AccountPredicate},
    },
    error::{KumanoError, KumanoResult},
    i18n::{Translator, DEFAULT_LOCALE},
    identity::ProviderRegistry,
    invitation::InvitationLedger,
    mailer::Mailer,
    reconcile::IdentityReconciler,
    session::{Session, SessionStore},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub sessions: SessionStore,
    pub mailer: Arc<Mailer>,
    pub providers: ProviderRegistry,
    pub reconciler: Arc<IdentityReconciler>,
    pub invitations: InvitationLedger,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> KumanoResult<Self> {
        config.validate()?;

        if !config.storage.data_directory.exists() {
            tokio::fs::create_dir_all(&config.storage.data_directory).await?;
        }

        let db = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;
        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        let providers = ProviderRegistry::from_config(&config.oauth)?;

        Self::from_parts(config, db, providers)
    }

    /// Assemble a context around an already migrated pool
    pub fn from_parts(
        config: ServerConfig,
        db: SqlitePool,
        providers: ProviderRegistry,
    ) -> KumanoResult<Self> {
        let mailer = Arc::new(Mailer::new(config.email.clone())?);
        let sessions = SessionStore::new(chrono::Duration::seconds(config.session.ttl_seconds));
        let reconciler = Arc::new(IdentityReconciler::new(Arc::new(RandomSuffixAllocator::new())));

        Ok(Self {
            config: Arc::new(config),
            db,
            sessions,
            mailer,
            providers,
            reconciler,
            invitations: InvitationLedger::new(),
        })
    }

    pub fn service_url(&self) -> &str {
        &self.config.service.public_url
    }
}

/// Everything one request reads and writes
///
/// Holds the open transaction together with the visitor's session. `finish`
/// writes the session in that same transaction and commits; dropping the
/// scope without finishing rolls every change back.
///
/// The transaction takes SQLite's write lock up front (`BEGIN IMMEDIATE`).
/// Scopes therefore run one after another instead of failing with a stale
/// snapshot when another request commits first. Keep slow work such as
/// provider round trips outside the scope.
pub struct RequestScope {
    pub tx: Transaction<'static, Sqlite>,
    pub session: Session,
    pub translator: Translator,
    store: SessionStore,
    cookie_name: String,
    secure_cookie: bool,
    loaded_id: Option<String>,
}

impl RequestScope {
    /// Open a write transaction and load the session named by the request cookie
    pub async fn begin(ctx: &AppContext, jar: &CookieJar) -> KumanoResult<Self> {
        let mut tx = ctx.db.begin_with("BEGIN IMMEDIATE").await?;
        let cookie_name = ctx.config.session.cookie_name.clone();

        let existing = match jar.get(&cookie_name) {
            Some(cookie) => ctx.sessions.load(&mut tx, cookie.value()).await?,
            None => None,
        };
        let loaded_id = existing.as_ref().map(|s| s.id().to_string());

        Ok(Self {
            tx,
            session: existing.unwrap_or_default(),
            translator: Translator::new(DEFAULT_LOCALE),
            store: ctx.sessions.clone(),
            cookie_name,
            secure_cookie: ctx.config.session.secure_cookie,
            loaded_id,
        })
    }

    /// Read the visitor's session without opening a scope
    pub async fn peek_session(ctx: &AppContext, jar: &CookieJar) -> KumanoResult<Option<Session>> {
        let Some(cookie) = jar.get(&ctx.config.session.cookie_name) else {
            return Ok(None);
        };

        let mut conn = ctx.db.acquire().await?;
        ctx.sessions.load(&mut conn, cookie.value()).await
    }

    /// Active account this session is logged in as
    pub async fn current_account(&mut self) -> KumanoResult<Option<Account>> {
        let Some(id) = self.session.current_account_id() else {
            return Ok(None);
        };

        let found = account::find(&mut self.tx, AccountPredicate::Id(&id)).await?;
        Ok(found.filter(Account::is_active))
    }

    /// Like `current_account`, but anonymous visitors get a 401
    pub async fn require_account(&mut self) -> KumanoResult<Account> {
        match self.current_account().await? {
            Some(account) => Ok(account),
            None => Err(KumanoError::Authentication(
                self.translator.t("auth.login.required"),
            )),
        }
    }

    /// Save the session if it changed, commit, and attach the session cookie
    ///
    /// A regenerated session replaces the row stored under its old id and
    /// gets a new cookie.
    pub async fn finish(mut self, jar: CookieJar) -> KumanoResult<CookieJar> {
        let mut jar = jar;

        if self.session.is_dirty() {
            if let Some(old_id) = self.loaded_id.as_deref() {
                if old_id != self.session.id() {
                    self.store.destroy(&mut self.tx, old_id).await?;
                }
            }
            self.store.save(&mut self.tx, &mut self.session).await?;
            if self.loaded_id.as_deref() != Some(self.session.id()) {
                let cookie = Cookie::build((self.cookie_name.clone(), self.session.id().to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .secure(self.secure_cookie);
                jar = jar.add(cookie);
            }
        }

        self.tx.commit().await?;
        Ok(jar)
    }
}
