/// Nickname allocation for newly activated accounts
use crate::{
    account::words::{ADJECTIVES, NOUNS},
    db::account::{self, AccountPredicate},
    error::KumanoResult,
};
use async_trait::async_trait;
use rand::{seq::SliceRandom, Rng};
use sqlx::SqliteConnection;

/// Chooses the nickname an account is stored with
#[async_trait]
pub trait NicknameAllocator: Send + Sync {
    /// Return `desired` if it is free, otherwise some variation of it.
    async fn allocate(&self, conn: &mut SqliteConnection, desired: &str) -> KumanoResult<String>;
}

/// Appends a random adjective+noun suffix when the desired nickname is taken.
///
/// The suffixed result is not checked again, and the check itself is not
/// atomic with the later write: two signups racing for the same nickname can
/// both pass. The unique index on `account.nickname` turns that case into a
/// failed activation rather than a duplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffixAllocator;

impl RandomSuffixAllocator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NicknameAllocator for RandomSuffixAllocator {
    async fn allocate(&self, conn: &mut SqliteConnection, desired: &str) -> KumanoResult<String> {
        if !account::exists(conn, AccountPredicate::Nickname(desired)).await? {
            return Ok(desired.to_string());
        }

        let nickname = format!("{}{}", desired, generate_suffix(&mut rand::thread_rng()));
        tracing::debug!("nickname: {} taken, falling back to {}", desired, nickname);
        Ok(nickname)
    }
}

/// One adjective and one noun, drawn independently, no separator
pub fn generate_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    // Both lists are non-empty constants
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Quick");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Fox");
    format!("{}{}", adjective, noun)
}

/// Split a generated suffix back into its adjective and noun
pub fn parse_suffix(suffix: &str) -> Option<(&'static str, &'static str)> {
    ADJECTIVES.iter().find_map(|adjective| {
        let rest = suffix.strip_prefix(adjective)?;
        NOUNS.iter().find(|noun| **noun == rest).map(|noun| (*adjective, *noun))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, account::Account, DatabaseOptions};
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::TempDir;

    #[test]
    fn test_suffix_is_adjective_then_noun() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let suffix = generate_suffix(&mut rng);
            assert!(parse_suffix(&suffix).is_some(), "malformed suffix {}", suffix);
        }
    }

    #[test]
    fn test_parse_suffix_rejects_unknown_words() {
        assert_eq!(parse_suffix("CrimsonDragon"), Some(("Crimson", "Dragon")));
        assert_eq!(parse_suffix("CrimsonToaster"), None);
        assert_eq!(parse_suffix(""), None);
    }

    #[tokio::test]
    async fn test_allocate_keeps_free_nickname_and_suffixes_taken_one() {
        let dir = TempDir::new().unwrap();
        let pool = db::create_pool(&dir.path().join("nick.sqlite"), DatabaseOptions::default())
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let allocator = RandomSuffixAllocator::new();
        assert_eq!(allocator.allocate(&mut conn, "nicomo").await.unwrap(), "nicomo");

        let mut taken = Account::placeholder(Some("nicomo@example.com".to_string()), None);
        taken.nickname = Some("nicomo".to_string());
        account::save(&mut conn, &taken).await.unwrap();

        let allocated = allocator.allocate(&mut conn, "nicomo").await.unwrap();
        assert_ne!(allocated, "nicomo");
        let suffix = allocated.strip_prefix("nicomo").unwrap();
        assert!(parse_suffix(suffix).is_some());
    }
}
