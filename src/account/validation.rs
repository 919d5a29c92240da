/// Account validation rules applied before create and update
use crate::db::account::Account;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

/// Field name to list of human readable messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn has_any(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn extend_from(&mut self, errors: validator::ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                self.add(field.to_string(), message);
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Validate)]
struct CreateRules {
    #[validate(email(message = "Email must be a valid address"))]
    email: String,
}

#[derive(Validate)]
struct UpdateRules {
    #[validate(length(min = 1, message = "Name can't be blank"))]
    name: String,
    #[validate(length(min = 1, message = "Nickname can't be blank"))]
    nickname: String,
    #[validate(url(message = "Doesn't look like a valid url..."))]
    avatar_url: String,
    #[validate(length(min = 1, message = "Provider can't be blank"))]
    provider: String,
    #[validate(length(min = 1, message = "ProviderID can't be blank"))]
    provider_id: String,
}

/// Rules checked when a placeholder is first inserted
pub fn validate_create(account: &Account) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match account.email.as_deref() {
        None | Some("") => errors.add("email", "Email can't be blank"),
        Some(email) => {
            if let Err(e) = (CreateRules { email: email.to_string() }).validate() {
                errors.extend_from(e);
            }
        }
    }
    errors
}

/// Rules checked when an active account is updated
pub fn validate_update(account: &Account) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let rules = UpdateRules {
        name: account.name.clone().unwrap_or_default(),
        nickname: account.nickname.clone().unwrap_or_default(),
        avatar_url: account.avatar_url.clone().unwrap_or_default(),
        provider: account.provider.clone().unwrap_or_default(),
        provider_id: account.provider_id.clone().unwrap_or_default(),
    };
    if let Err(e) = rules.validate() {
        errors.extend_from(e);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::account::Lifecycle;

    fn active_account() -> Account {
        let mut account = Account::placeholder(Some("alice@example.com".to_string()), None);
        account.lifecycle = Lifecycle::Active;
        account.name = Some("Alice".to_string());
        account.nickname = Some("alice".to_string());
        account.avatar_url = Some("https://avatars.example.com/alice.png".to_string());
        account.provider = Some("github".to_string());
        account.provider_id = Some("1001".to_string());
        account
    }

    #[test]
    fn test_valid_update_has_no_errors() {
        assert!(!validate_update(&active_account()).has_any());
    }

    #[test]
    fn test_update_requires_name_and_url() {
        let mut account = active_account();
        account.name = None;
        account.avatar_url = Some("not a url".to_string());

        let errors = validate_update(&account);
        assert!(errors.get("name").is_some());
        assert_eq!(
            errors.get("avatar_url").unwrap(),
            &["Doesn't look like a valid url...".to_string()]
        );
        assert!(errors.get("nickname").is_none());
    }

    #[test]
    fn test_create_requires_email() {
        let account = Account::placeholder(None, None);
        let errors = validate_create(&account);
        assert_eq!(errors.get("email").unwrap(), &["Email can't be blank".to_string()]);

        let account = Account::placeholder(Some("nope".to_string()), None);
        assert!(validate_create(&account).get("email").is_some());
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email has already been taken");
        errors.add("nickname", "Nickname has already been taken");
        assert_eq!(
            errors.to_string(),
            "email: Email has already been taken; nickname: Nickname has already been taken"
        );
    }
}
