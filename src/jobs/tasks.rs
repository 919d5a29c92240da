/// Background task implementations
use crate::{context::AppContext, db, error::KumanoResult};
use chrono::{Duration, Utc};

/// Nonces older than this can no longer be replayed against a live state
const CALLBACK_NONCE_RETENTION_DAYS: i64 = 7;

/// Cleanup expired sessions
pub async fn cleanup_expired_sessions(ctx: &AppContext) -> KumanoResult<u64> {
    ctx.sessions.cleanup_expired(&ctx.db).await
}

/// Delete recorded login callback nonces past retention
pub async fn cleanup_callback_nonces(ctx: &AppContext) -> KumanoResult<u64> {
    let cutoff = Utc::now() - Duration::days(CALLBACK_NONCE_RETENTION_DAYS);

    let result = sqlx::query("DELETE FROM auth_callback WHERE seen_at < ?1")
        .bind(cutoff)
        .execute(&ctx.db)
        .await?;

    Ok(result.rows_affected())
}

/// Verify the database answers
pub async fn health_check(ctx: &AppContext) -> KumanoResult<()> {
    db::test_connection(&ctx.db).await
}
