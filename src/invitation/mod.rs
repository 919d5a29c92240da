/// Invitation ledger
///
/// An invitation is a placeholder account carrying a single-use token. The
/// token stays on the placeholder until the invitee finishes external
/// authentication, so an interrupted signup can be resumed from the same link.
use crate::{
    db::account::{self, Account, AccountPredicate},
    error::{KumanoError, KumanoResult},
    session::{Session, PENDING_INVITEE_ID},
};
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::SqliteConnection;

const TOKEN_LENGTH: usize = 32;
const MAX_TOKEN_ATTEMPTS: usize = 5;

/// Issues and redeems invitation tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct InvitationLedger;

impl InvitationLedger {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new invitation token
    pub fn generate_token() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Create a placeholder account for `email`, sponsored by `sponsor`
    ///
    /// Members need a remaining invitation allowance (`sponsorships_count`),
    /// which this call decrements. Admins are not limited.
    pub async fn issue_placeholder(
        &self,
        conn: &mut SqliteConnection,
        sponsor: &Account,
        email: &str,
    ) -> KumanoResult<Account> {
        if !sponsor.is_active() {
            return Err(KumanoError::Authorization(
                "Only active members can send invitations".to_string(),
            ));
        }
        // Admins invite without limit; everyone else spends their allowance
        if !sponsor.is_admin && !account::spend_sponsorship(conn, &sponsor.id).await? {
            return Err(KumanoError::Authorization(
                "No invitations left to send".to_string(),
            ));
        }

        let mut placeholder = Account::placeholder(Some(email.trim().to_string()), Some(sponsor.id.clone()));
        placeholder.invitation_token = self.fresh_token(conn).await?;
        placeholder.invited_at = Some(Utc::now());

        let errors = account::create(conn, &placeholder).await?;
        if errors.has_any() {
            return Err(KumanoError::Validation(errors));
        }

        tracing::info!(
            "invitation: {} invited {} as placeholder {}",
            sponsor.id,
            email,
            placeholder.id
        );
        Ok(placeholder)
    }

    /// Look up the placeholder for `token` and mark it as the session's
    /// pending invitee. The token itself is left in place.
    pub async fn redeem(
        &self,
        conn: &mut SqliteConnection,
        session: &mut Session,
        token: &str,
    ) -> KumanoResult<Account> {
        let placeholder = account::find(conn, AccountPredicate::InvitationToken(token))
            .await?
            .filter(|a| !a.is_active())
            .ok_or(KumanoError::InvitationNotFound)?;

        session.set(PENDING_INVITEE_ID, &placeholder.id)?;
        tracing::info!("invitation: token redeemed for placeholder {}", placeholder.id);
        Ok(placeholder)
    }

    async fn fresh_token(&self, conn: &mut SqliteConnection) -> KumanoResult<String> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = Self::generate_token();
            if !account::exists(conn, AccountPredicate::InvitationToken(&token)).await? {
                return Ok(token);
            }
        }
        Err(KumanoError::Internal(
            "Could not generate a unique invitation token".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, account::Lifecycle, DatabaseOptions};
    use tempfile::TempDir;

    async fn setup() -> (TempDir, sqlx::SqlitePool, Account) {
        let dir = TempDir::new().unwrap();
        let pool = db::create_pool(&dir.path().join("inv.sqlite"), DatabaseOptions::default())
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();

        let mut sponsor = Account::placeholder(Some("sponsor@example.com".to_string()), None);
        sponsor.lifecycle = Lifecycle::Active;
        sponsor.name = Some("Sponsor".to_string());
        sponsor.nickname = Some("sponsor".to_string());
        sponsor.provider = Some("github".to_string());
        sponsor.provider_id = Some("1".to_string());
        sponsor.sponsorships_count = 2;
        let mut conn = pool.acquire().await.unwrap();
        account::save(&mut conn, &sponsor).await.unwrap();

        (dir, pool, sponsor)
    }

    #[test]
    fn test_generate_token() {
        let token = InvitationLedger::generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, InvitationLedger::generate_token());
    }

    #[tokio::test]
    async fn test_issue_placeholder() {
        let (_dir, pool, sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let ledger = InvitationLedger::new();

        let placeholder = ledger
            .issue_placeholder(&mut conn, &sponsor, "friend@example.com")
            .await
            .unwrap();

        let stored = account::get(&mut conn, &placeholder.id).await.unwrap();
        assert_eq!(stored.lifecycle, Lifecycle::Placeholder);
        assert_eq!(stored.score, 0);
        assert!(!stored.invitation_token.is_empty());
        assert_eq!(stored.sponsor_id.as_deref(), Some(sponsor.id.as_str()));
        assert!(stored.provider.is_none());

        let sponsor = account::get(&mut conn, &sponsor.id).await.unwrap();
        assert_eq!(sponsor.sponsorships_count, 1);
    }

    #[tokio::test]
    async fn test_member_without_allowance_cannot_invite() {
        let (_dir, pool, mut sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        sponsor.sponsorships_count = 0;
        account::save(&mut conn, &sponsor).await.unwrap();

        let err = InvitationLedger::new()
            .issue_placeholder(&mut conn, &sponsor, "friend@example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, KumanoError::Authorization(_)));
        assert!(!account::exists(&mut conn, AccountPredicate::Email("friend@example.com"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_allowance_runs_out() {
        let (_dir, pool, sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let ledger = InvitationLedger::new();

        for email in ["one@example.com", "two@example.com"] {
            let current = account::get(&mut conn, &sponsor.id).await.unwrap();
            ledger.issue_placeholder(&mut conn, &current, email).await.unwrap();
        }

        // A stale copy still claiming an allowance is refused by the store
        let err = ledger
            .issue_placeholder(&mut conn, &sponsor, "three@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, KumanoError::Authorization(_)));
        assert_eq!(account::get(&mut conn, &sponsor.id).await.unwrap().sponsorships_count, 0);
        assert!(!account::exists(&mut conn, AccountPredicate::Email("three@example.com"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_admin_invites_without_allowance() {
        let (_dir, pool, mut admin) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        admin.is_admin = true;
        admin.sponsorships_count = 0;
        account::save(&mut conn, &admin).await.unwrap();

        InvitationLedger::new()
            .issue_placeholder(&mut conn, &admin, "friend@example.com")
            .await
            .unwrap();

        let admin = account::get(&mut conn, &admin.id).await.unwrap();
        assert_eq!(admin.sponsorships_count, 0);
    }

    #[tokio::test]
    async fn test_issue_rejects_duplicate_email() {
        let (_dir, pool, sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let ledger = InvitationLedger::new();

        ledger
            .issue_placeholder(&mut conn, &sponsor, "friend@example.com")
            .await
            .unwrap();
        let err = ledger
            .issue_placeholder(&mut conn, &sponsor, "friend@example.com")
            .await
            .unwrap_err();

        match err {
            KumanoError::Validation(errors) => assert!(errors.get("email").is_some()),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_placeholder_cannot_invite() {
        let (_dir, pool, _sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();

        let not_active = Account::placeholder(Some("x@example.com".to_string()), None);
        let err = InvitationLedger::new()
            .issue_placeholder(&mut conn, &not_active, "y@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, KumanoError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_redeem_sets_pending_invitee_and_keeps_token() {
        let (_dir, pool, sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let ledger = InvitationLedger::new();

        let placeholder = ledger
            .issue_placeholder(&mut conn, &sponsor, "friend@example.com")
            .await
            .unwrap();

        let mut session = Session::new();
        let redeemed = ledger
            .redeem(&mut conn, &mut session, &placeholder.invitation_token)
            .await
            .unwrap();

        assert_eq!(redeemed.id, placeholder.id);
        assert_eq!(
            session.get::<String>(PENDING_INVITEE_ID).as_deref(),
            Some(placeholder.id.as_str())
        );

        // Revisiting the link before finishing signup still works
        let again = ledger
            .redeem(&mut conn, &mut Session::new(), &placeholder.invitation_token)
            .await
            .unwrap();
        assert_eq!(again.id, placeholder.id);
    }

    #[tokio::test]
    async fn test_redeem_unknown_token_is_not_found() {
        let (_dir, pool, _sponsor) = setup().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut session = Session::new();

        let err = InvitationLedger::new()
            .redeem(&mut conn, &mut session, "never-issued")
            .await
            .unwrap_err();

        assert!(matches!(err, KumanoError::InvitationNotFound));
        assert!(!session.is_dirty());
    }
}
