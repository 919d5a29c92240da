/// Identity reconciliation
///
/// Maps a verified external identity plus the caller's session onto an
/// account lifecycle transition:
///
/// ```text
/// Unauthenticated ─┬─ provider identity already linked ──────────► ReturningMember
///                  ├─ session holds a pending invitee placeholder ─► PendingInviteeActivation
///                  └─ neither ─────────────────────────────────────► Rejected
/// ```
///
/// Every read and write goes through the request transaction, so a failed
/// request leaves no partial update behind. A successful login moves the
/// session to a fresh id.
use crate::{
    account::{NicknameAllocator, ScoreEvent, ValidationErrors},
    context::RequestScope,
    db::account::{self, Account, AccountPredicate, Lifecycle},
    error::{KumanoError, KumanoResult},
    identity::VerifiedIdentity,
    session::{Session, CURRENT_ACCOUNT_ID, PENDING_INVITEE_ID},
};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use std::sync::Arc;

/// Which branch an incoming identity takes
#[derive(Debug, Clone)]
pub enum Disposition {
    ReturningMember(Account),
    PendingInviteeActivation(Account),
    Rejected,
}

/// Shown once when the provider's nickname was already taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NicknameNotice {
    pub requested: String,
    pub assigned: String,
}

/// Result of reconciling one callback
#[derive(Debug, Clone)]
pub enum Reconciliation {
    /// Existing member logged in; session established
    ReturningMember { account: Account },
    /// Placeholder promoted to an active account; session established
    Activated {
        account: Account,
        nickname_notice: Option<NicknameNotice>,
    },
    /// No linked account and no pending invitation; nothing changed
    Rejected,
    /// Returning member failed validation; nothing written, no session
    Invalid {
        account_id: String,
        errors: ValidationErrors,
    },
    /// Callback nonce already processed; nothing changed
    Duplicate,
}

pub struct IdentityReconciler {
    nicknames: Arc<dyn NicknameAllocator>,
}

impl IdentityReconciler {
    pub fn new(nicknames: Arc<dyn NicknameAllocator>) -> Self {
        Self { nicknames }
    }

    /// Reconcile a verified identity within the request scope
    pub async fn reconcile(
        &self,
        scope: &mut RequestScope,
        identity: &VerifiedIdentity,
    ) -> KumanoResult<Reconciliation> {
        self.reconcile_at(&mut scope.tx, &mut scope.session, identity, Utc::now())
            .await
    }

    /// Reconcile against an explicit connection, session and clock
    pub async fn reconcile_at(
        &self,
        conn: &mut SqliteConnection,
        session: &mut Session,
        identity: &VerifiedIdentity,
        now: DateTime<Utc>,
    ) -> KumanoResult<Reconciliation> {
        if let Some(nonce) = identity.callback_nonce.as_deref() {
            if !record_nonce(conn, &identity.provider, nonce, now).await? {
                tracing::info!(
                    "reconcile: duplicate {} callback ignored",
                    identity.provider
                );
                return Ok(Reconciliation::Duplicate);
            }
        }

        match classify(conn, session, identity).await? {
            Disposition::ReturningMember(member) => {
                self.log_in(conn, session, member, now).await
            }
            Disposition::PendingInviteeActivation(placeholder) => {
                self.activate(conn, session, placeholder, identity, now).await
            }
            Disposition::Rejected => {
                tracing::info!(
                    "reconcile: rejected unsolicited {} identity {}",
                    identity.provider,
                    identity.provider_user_id
                );
                Ok(Reconciliation::Rejected)
            }
        }
    }

    async fn log_in(
        &self,
        conn: &mut SqliteConnection,
        session: &mut Session,
        member: Account,
        now: DateTime<Utc>,
    ) -> KumanoResult<Reconciliation> {
        let mut updated = member.clone();
        updated.score += ScoreEvent::LoggedIn {
            last_login: member.last_login_at,
            now,
        }
        .delta();
        updated.last_login_at = Some(now);

        let errors = account::update_with_validation(conn, &updated).await?;
        if errors.has_any() {
            tracing::warn!("reconcile: account {} failed validation: {}", member.id, errors);
            return Ok(Reconciliation::Invalid {
                account_id: member.id,
                errors,
            });
        }

        // An invitation link opened before logging in has nothing left to do
        session.remove(PENDING_INVITEE_ID);
        session.regenerate();
        session.set(CURRENT_ACCOUNT_ID, &updated.id)?;
        tracing::info!(
            "reconcile: member {} logged in, score {} -> {}",
            updated.id,
            member.score,
            updated.score
        );
        Ok(Reconciliation::ReturningMember { account: updated })
    }

    async fn activate(
        &self,
        conn: &mut SqliteConnection,
        session: &mut Session,
        placeholder: Account,
        identity: &VerifiedIdentity,
        now: DateTime<Utc>,
    ) -> KumanoResult<Reconciliation> {
        let mut activated = placeholder;
        activated.name = Some(identity.display_name.clone());
        activated.provider = Some(identity.provider.clone());
        activated.provider_id = Some(identity.provider_user_id.clone());
        activated.avatar_url = Some(identity.avatar_url.clone());

        let requested = desired_nickname(identity);
        let assigned = self.nicknames.allocate(conn, &requested).await?;
        let nickname_notice = (assigned != requested).then(|| NicknameNotice {
            requested: requested.clone(),
            assigned: assigned.clone(),
        });
        activated.nickname = Some(assigned);

        activated.score += ScoreEvent::AccountCreated.delta();
        activated.signed_up_at = Some(now);
        activated.last_login_at = Some(now);
        activated.invitation_token.clear();
        activated.lifecycle = Lifecycle::Active;

        account::activate(conn, &activated).await?;

        session.remove(PENDING_INVITEE_ID);
        session.regenerate();
        session.set(CURRENT_ACCOUNT_ID, &activated.id)?;
        tracing::info!(
            "reconcile: placeholder {} activated via {} as @{}",
            activated.id,
            identity.provider,
            activated.nickname.as_deref().unwrap_or_default()
        );

        Ok(Reconciliation::Activated {
            account: activated,
            nickname_notice,
        })
    }
}

/// Decide the branch without mutating anything except a stale pending id
pub async fn classify(
    conn: &mut SqliteConnection,
    session: &mut Session,
    identity: &VerifiedIdentity,
) -> KumanoResult<Disposition> {
    let linked = account::find(
        conn,
        AccountPredicate::Provider {
            provider: &identity.provider,
            provider_id: &identity.provider_user_id,
        },
    )
    .await?;

    if let Some(member) = linked {
        return Ok(Disposition::ReturningMember(member));
    }

    let Some(pending_id) = session.get::<String>(PENDING_INVITEE_ID) else {
        return Ok(Disposition::Rejected);
    };

    match account::find(conn, AccountPredicate::Id(&pending_id)).await? {
        Some(placeholder) if placeholder.is_active() => Err(KumanoError::Conflict(format!(
            "Invitation for account {} was already completed",
            placeholder.id
        ))),
        Some(placeholder) => Ok(Disposition::PendingInviteeActivation(placeholder)),
        None => {
            tracing::warn!("reconcile: pending invitee {} no longer exists", pending_id);
            session.remove(PENDING_INVITEE_ID);
            Ok(Disposition::Rejected)
        }
    }
}

/// Provider nickname, or a stable stand-in when the provider sent none
fn desired_nickname(identity: &VerifiedIdentity) -> String {
    let nickname = identity.nickname.trim();
    if nickname.is_empty() {
        format!("{}{}", identity.provider, identity.provider_user_id)
    } else {
        nickname.to_string()
    }
}

/// Returns false when the nonce was already seen
async fn record_nonce(
    conn: &mut SqliteConnection,
    provider: &str,
    nonce: &str,
    now: DateTime<Utc>,
) -> KumanoResult<bool> {
    let result = sqlx::query(
        "INSERT INTO auth_callback (nonce, provider, seen_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(nonce) DO NOTHING",
    )
    .bind(nonce)
    .bind(provider)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
