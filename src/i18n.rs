/// User-facing message lookup
///
/// Only the default English table ships; unknown keys render as themselves.

pub const DEFAULT_LOCALE: &str = "en-US";

const EN_US: &[(&str, &str)] = &[
    ("auth.callback.failure", "We couldn't find an invitation for this account. Kumano is invitation only."),
    ("auth.invitation.failure", "This invitation is invalid or has already been used."),
    ("auth.destroy.success", "You have been logged out."),
    ("auth.nickname.taken", "@{} was already taken, we used @{}. Hope you like it. You can change it in your profile."),
    ("auth.login.required", "You need to be logged in to do that."),
    ("users.invitation.sent", "Invitation sent to {}."),
    ("users.invitation.mail_failed", "The invitation for {} was created but the email could not be sent."),
];

#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
}

impl Translator {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve a key with no arguments
    pub fn t(&self, key: &str) -> String {
        self.t_with(key, &[])
    }

    /// Resolve a key, filling each `{}` in order
    pub fn t_with(&self, key: &str, args: &[&str]) -> String {
        let template = EN_US
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or(key);

        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut parts = template.split("{}").peekable();
        while let Some(part) = parts.next() {
            out.push_str(part);
            if parts.peek().is_some() {
                out.push_str(args.next().copied().unwrap_or(""));
            }
        }
        out
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}
