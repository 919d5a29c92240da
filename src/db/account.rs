/// Account database models and operations
///
/// Every operation takes a `&mut SqliteConnection` so callers run it inside
/// the request transaction.
use crate::{
    account::validation::{self, ValidationErrors},
    error::{KumanoError, KumanoResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use std::str::FromStr;
use uuid::Uuid;

const ACCOUNT_COLUMNS: &str = "id, lifecycle, name, nickname, bio, avatar_url, email, provider, \
     provider_id, score, invitation_token, is_admin, sponsorships_count, sponsor_id, created_at, \
     updated_at, invited_at, signed_up_at, last_login_at, last_posted_at";

/// Where an account is in its two-phase materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Created by an invitation, no external identity linked yet
    Placeholder,
    /// External identity linked, invitation token cleared
    Active,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Placeholder => "placeholder",
            Lifecycle::Active => "active",
        }
    }
}

impl FromStr for Lifecycle {
    type Err = KumanoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "placeholder" => Ok(Lifecycle::Placeholder),
            "active" => Ok(Lifecycle::Active),
            _ => Err(KumanoError::Internal(format!("Invalid lifecycle: {}", s))),
        }
    }
}

/// Account record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub lifecycle: Lifecycle,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub provider: Option<String>,
    pub provider_id: Option<String>,
    /// Running reputation, no floor
    pub score: i64,
    /// Empty once redeemed
    #[serde(skip_serializing)]
    pub invitation_token: String,
    pub is_admin: bool,
    pub sponsorships_count: i64,
    /// Weak reference, cleared if the sponsor goes away
    pub sponsor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub invited_at: Option<DateTime<Utc>>,
    pub signed_up_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_posted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Build an unsaved placeholder with no token yet
    pub fn placeholder(email: Option<String>, sponsor_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            lifecycle: Lifecycle::Placeholder,
            name: None,
            nickname: None,
            bio: None,
            avatar_url: None,
            email,
            provider: None,
            provider_id: None,
            score: 0,
            invitation_token: String::new(),
            is_admin: false,
            sponsorships_count: 0,
            sponsor_id,
            created_at: now,
            updated_at: now,
            invited_at: None,
            signed_up_at: None,
            last_login_at: None,
            last_posted_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    fn from_row(row: &SqliteRow) -> KumanoResult<Self> {
        let lifecycle: String = row.try_get("lifecycle")?;
        Ok(Self {
            id: row.try_get("id")?,
            lifecycle: lifecycle.parse()?,
            name: row.try_get("name")?,
            nickname: row.try_get("nickname")?,
            bio: row.try_get("bio")?,
            avatar_url: row.try_get("avatar_url")?,
            email: row.try_get("email")?,
            provider: row.try_get("provider")?,
            provider_id: row.try_get("provider_id")?,
            score: row.try_get("score")?,
            invitation_token: row.try_get("invitation_token")?,
            is_admin: row.try_get("is_admin")?,
            sponsorships_count: row.try_get("sponsorships_count")?,
            sponsor_id: row.try_get("sponsor_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            invited_at: row.try_get("invited_at")?,
            signed_up_at: row.try_get("signed_up_at")?,
            last_login_at: row.try_get("last_login_at")?,
            last_posted_at: row.try_get("last_posted_at")?,
        })
    }
}

/// Lookup keys understood by [`find`]
#[derive(Debug, Clone, Copy)]
pub enum AccountPredicate<'a> {
    Id(&'a str),
    Provider { provider: &'a str, provider_id: &'a str },
    Nickname(&'a str),
    Email(&'a str),
    InvitationToken(&'a str),
}

impl AccountPredicate<'_> {
    fn clause(&self) -> &'static str {
        match self {
            AccountPredicate::Id(_) => "id = ?1",
            AccountPredicate::Provider { .. } => "provider = ?1 AND provider_id = ?2",
            AccountPredicate::Nickname(_) => "nickname = ?1",
            // Addresses differing only in case belong to the same person
            AccountPredicate::Email(_) => "email = ?1 COLLATE NOCASE",
            // An empty token never matches a redeemed account
            AccountPredicate::InvitationToken(_) => "invitation_token = ?1 AND invitation_token <> ''",
        }
    }
}

/// Find the first account matching a predicate
pub async fn find(
    conn: &mut SqliteConnection,
    predicate: AccountPredicate<'_>,
) -> KumanoResult<Option<Account>> {
    let sql = format!(
        "SELECT {} FROM account WHERE {} LIMIT 1",
        ACCOUNT_COLUMNS,
        predicate.clause()
    );
    let query = sqlx::query(&sql);
    let query = match predicate {
        AccountPredicate::Id(v)
        | AccountPredicate::Nickname(v)
        | AccountPredicate::Email(v)
        | AccountPredicate::InvitationToken(v) => query.bind(v),
        AccountPredicate::Provider {
            provider,
            provider_id,
        } => query.bind(provider).bind(provider_id),
    };

    let row = query.fetch_optional(&mut *conn).await?;
    row.as_ref().map(Account::from_row).transpose()
}

/// Check whether any account matches a predicate
pub async fn exists(
    conn: &mut SqliteConnection,
    predicate: AccountPredicate<'_>,
) -> KumanoResult<bool> {
    Ok(find(conn, predicate).await?.is_some())
}

/// Load an account that must exist
pub async fn get(conn: &mut SqliteConnection, id: &str) -> KumanoResult<Account> {
    find(conn, AccountPredicate::Id(id))
        .await?
        .ok_or_else(|| KumanoError::NotFound(format!("Account {} not found", id)))
}

/// Validate then insert. Returns the validation errors; empty means inserted.
pub async fn create(conn: &mut SqliteConnection, account: &Account) -> KumanoResult<ValidationErrors> {
    let mut errors = validation::validate_create(account);
    check_unique_fields(conn, account, &mut errors).await?;
    if errors.has_any() {
        return Ok(errors);
    }

    insert(conn, account).await?;
    Ok(errors)
}

/// Validate then update every mutable column. Returns the validation errors;
/// nothing is written when any are reported.
pub async fn update_with_validation(
    conn: &mut SqliteConnection,
    account: &Account,
) -> KumanoResult<ValidationErrors> {
    let mut errors = validation::validate_update(account);
    check_unique_fields(conn, account, &mut errors).await?;
    if errors.has_any() {
        return Ok(errors);
    }

    update(conn, account).await?;
    Ok(errors)
}

/// Create-or-update without validation; constraint violations surface as
/// database errors.
pub async fn save(conn: &mut SqliteConnection, account: &Account) -> KumanoResult<()> {
    if exists(conn, AccountPredicate::Id(&account.id)).await? {
        update(conn, account).await
    } else {
        insert(conn, account).await
    }
}

/// Promote a placeholder to an active account. Only succeeds while the stored
/// row is still a placeholder, so of two racing activations exactly one wins.
pub async fn activate(conn: &mut SqliteConnection, account: &Account) -> KumanoResult<()> {
    let result = sqlx::query(
        "UPDATE account
         SET lifecycle = 'active', name = ?2, nickname = ?3, avatar_url = ?4, provider = ?5,
             provider_id = ?6, score = ?7, invitation_token = ?8, signed_up_at = ?9,
             last_login_at = ?10, updated_at = ?11
         WHERE id = ?1 AND lifecycle = 'placeholder'",
    )
    .bind(&account.id)
    .bind(&account.name)
    .bind(&account.nickname)
    .bind(&account.avatar_url)
    .bind(&account.provider)
    .bind(&account.provider_id)
    .bind(account.score)
    .bind(&account.invitation_token)
    .bind(account.signed_up_at)
    .bind(account.last_login_at)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await
    .map_err(map_unique_violation)?;

    if result.rows_affected() == 0 {
        return Err(KumanoError::Conflict(format!(
            "Account {} is no longer awaiting activation",
            account.id
        )));
    }

    Ok(())
}

/// Use up one of the sponsor's remaining invitations. Returns false when the
/// allowance is already exhausted.
pub async fn spend_sponsorship(conn: &mut SqliteConnection, sponsor_id: &str) -> KumanoResult<bool> {
    let result = sqlx::query(
        "UPDATE account SET sponsorships_count = sponsorships_count - 1, updated_at = ?2
         WHERE id = ?1 AND sponsorships_count > 0",
    )
    .bind(sponsor_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

async fn insert(conn: &mut SqliteConnection, account: &Account) -> KumanoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO account ({})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        ACCOUNT_COLUMNS
    ))
    .bind(&account.id)
    .bind(account.lifecycle.as_str())
    .bind(&account.name)
    .bind(&account.nickname)
    .bind(&account.bio)
    .bind(&account.avatar_url)
    .bind(&account.email)
    .bind(&account.provider)
    .bind(&account.provider_id)
    .bind(account.score)
    .bind(&account.invitation_token)
    .bind(account.is_admin)
    .bind(account.sponsorships_count)
    .bind(&account.sponsor_id)
    .bind(account.created_at)
    .bind(account.updated_at)
    .bind(account.invited_at)
    .bind(account.signed_up_at)
    .bind(account.last_login_at)
    .bind(account.last_posted_at)
    .execute(&mut *conn)
    .await
    .map_err(map_unique_violation)?;

    Ok(())
}

async fn update(conn: &mut SqliteConnection, account: &Account) -> KumanoResult<()> {
    sqlx::query(
        "UPDATE account
         SET lifecycle = ?2, name = ?3, nickname = ?4, bio = ?5, avatar_url = ?6, email = ?7,
             provider = ?8, provider_id = ?9, score = ?10, invitation_token = ?11, is_admin = ?12,
             sponsorships_count = ?13, sponsor_id = ?14, updated_at = ?15, invited_at = ?16,
             signed_up_at = ?17, last_login_at = ?18, last_posted_at = ?19
         WHERE id = ?1",
    )
    .bind(&account.id)
    .bind(account.lifecycle.as_str())
    .bind(&account.name)
    .bind(&account.nickname)
    .bind(&account.bio)
    .bind(&account.avatar_url)
    .bind(&account.email)
    .bind(&account.provider)
    .bind(&account.provider_id)
    .bind(account.score)
    .bind(&account.invitation_token)
    .bind(account.is_admin)
    .bind(account.sponsorships_count)
    .bind(&account.sponsor_id)
    .bind(Utc::now())
    .bind(account.invited_at)
    .bind(account.signed_up_at)
    .bind(account.last_login_at)
    .bind(account.last_posted_at)
    .execute(&mut *conn)
    .await
    .map_err(map_unique_violation)?;

    Ok(())
}

/// Report nickname/email collisions with other accounts as validation errors
async fn check_unique_fields(
    conn: &mut SqliteConnection,
    account: &Account,
    errors: &mut ValidationErrors,
) -> KumanoResult<()> {
    if let Some(email) = account.email.as_deref().filter(|e| !e.is_empty()) {
        if taken_by_other(conn, AccountPredicate::Email(email), &account.id).await? {
            errors.add("email", "Email has already been taken");
        }
    }

    if let Some(nickname) = account.nickname.as_deref().filter(|n| !n.is_empty()) {
        if taken_by_other(conn, AccountPredicate::Nickname(nickname), &account.id).await? {
            errors.add("nickname", "Nickname has already been taken");
        }
    }

    Ok(())
}

/// Single-value predicates only: the excluded id binds as `?2`
async fn taken_by_other(
    conn: &mut SqliteConnection,
    predicate: AccountPredicate<'_>,
    id: &str,
) -> KumanoResult<bool> {
    let value = match predicate {
        AccountPredicate::Email(v) | AccountPredicate::Nickname(v) => v,
        other => {
            return Err(KumanoError::Internal(format!(
                "Uniqueness check not supported for {:?}",
                other
            )))
        }
    };

    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM account WHERE {} AND id <> ?2)",
        predicate.clause()
    );
    let taken: i64 = sqlx::query_scalar(&sql)
        .bind(value)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(taken != 0)
}

fn map_unique_violation(e: sqlx::Error) -> KumanoError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return KumanoError::Conflict(db_err.message().to_string());
        }
    }
    KumanoError::Database(e)
}
