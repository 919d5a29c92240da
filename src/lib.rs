/// Kumano - invitation-only community site
///
/// Identity reconciliation, invitations and member reputation behind a small
/// axum HTTP surface.

pub mod account;
pub mod api;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod i18n;
pub mod identity;
pub mod invitation;
pub mod jobs;
pub mod mailer;
pub mod reconcile;
pub mod server;
pub mod session;
