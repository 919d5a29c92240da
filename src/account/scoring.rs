//! Reputation points
//!
//! Points are given to members according to their behavior on the site.
//! Scores have no floor and no decay besides the login absence penalty.

use chrono::{DateTime, Utc};

pub const POINTS_CREATES_ACCOUNT: i64 = 30;
pub const POINTS_LOGS_IN: i64 = 1;
pub const POINTS_POSTS: i64 = 5;
pub const POINTS_PER_DAY_AWAY: i64 = -1;
pub const POINTS_TEXT_STARRED: i64 = 1;
pub const POINTS_TEXT_FLAGGED: i64 = -10;

const MINUTES_PER_DAY: i64 = 1440;

/// Events that move an account's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    AccountCreated,
    LoggedIn {
        last_login: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    },
    TextPosted,
    TextStarred,
    TextFlagged,
}

impl ScoreEvent {
    pub fn delta(&self) -> i64 {
        match *self {
            ScoreEvent::AccountCreated => POINTS_CREATES_ACCOUNT,
            ScoreEvent::LoggedIn { last_login, now } => login_delta(last_login, now),
            ScoreEvent::TextPosted => POINTS_POSTS,
            ScoreEvent::TextStarred => POINTS_TEXT_STARRED,
            ScoreEvent::TextFlagged => POINTS_TEXT_FLAGGED,
        }
    }
}

/// Whole days between two instants, counted as whole minutes first
pub fn days_away(last_login: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let minutes = (now - last_login).num_minutes();
    minutes / MINUTES_PER_DAY
}

/// Login bonus minus one point per whole day since the previous login.
/// An account with no recorded login gets the bare bonus.
pub fn login_delta(last_login: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    let away = last_login.map(|last| days_away(last, now)).unwrap_or(0);
    POINTS_LOGS_IN + away * POINTS_PER_DAY_AWAY
}
