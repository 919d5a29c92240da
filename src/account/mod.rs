/// Account rules
///
/// Validation, nickname allocation and reputation scoring for member accounts.

pub mod nickname;
pub mod scoring;
pub mod validation;
mod words;

pub use nickname::{NicknameAllocator, RandomSuffixAllocator};
pub use scoring::ScoreEvent;
pub use validation::ValidationErrors;

use crate::db::account::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub score: i64,
    pub is_admin: bool,
    pub sponsorships_count: i64,
    pub sponsor_id: Option<String>,
    pub signed_up_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            nickname: account.nickname.clone(),
            bio: account.bio.clone(),
            avatar_url: account.avatar_url.clone(),
            score: account.score,
            is_admin: account.is_admin,
            sponsorships_count: account.sponsorships_count,
            sponsor_id: account.sponsor_id.clone(),
            signed_up_at: account.signed_up_at,
            last_login_at: account.last_login_at,
        }
    }
}
