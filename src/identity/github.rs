/// GitHub OAuth2 provider
use super::{IdentityProvider, VerifiedIdentity};
use crate::{
    config::OAuthProviderConfig,
    error::{KumanoError, KumanoResult},
};
use async_trait::async_trait;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const SCOPE: &str = "read:user";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct GitHubUser {
    id: u64,
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

pub struct GitHubProvider {
    config: OAuthProviderConfig,
    client: reqwest::Client,
}

impl GitHubProvider {
    pub fn new(config: OAuthProviderConfig) -> KumanoResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("kumano/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| KumanoError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    async fn exchange_code(&self, code: &str) -> KumanoResult<String> {
        let response: TokenResponse = self
            .client
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "client_id": self.config.client_id,
                "client_secret": self.config.client_secret,
                "code": code,
                "redirect_uri": self.config.callback_url,
            }))
            .send()
            .await
            .map_err(|e| KumanoError::Authentication(format!("GitHub token exchange failed: {}", e)))?
            .json()
            .await
            .map_err(|e| KumanoError::Authentication(format!("Unreadable GitHub token response: {}", e)))?;

        match response {
            TokenResponse {
                access_token: Some(token),
                ..
            } => Ok(token),
            TokenResponse {
                error,
                error_description,
                ..
            } => Err(KumanoError::Authentication(format!(
                "GitHub rejected the code: {}",
                error_description
                    .or(error)
                    .unwrap_or_else(|| "no access token".to_string())
            ))),
        }
    }
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn name(&self) -> &str {
        "github"
    }

    fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.callback_url),
            urlencoding::encode(SCOPE),
            urlencoding::encode(state),
        )
    }

    async fn complete(&self, code: &str, state: &str) -> KumanoResult<VerifiedIdentity> {
        let token = self.exchange_code(code).await?;

        let user: GitHubUser = self
            .client
            .get(USER_URL)
            .bearer_auth(&token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| KumanoError::Authentication(format!("GitHub user lookup failed: {}", e)))?
            .json()
            .await
            .map_err(|e| KumanoError::Authentication(format!("Unreadable GitHub user: {}", e)))?;

        tracing::debug!("github: verified user {} ({})", user.login, user.id);

        Ok(VerifiedIdentity {
            provider: self.name().to_string(),
            provider_user_id: user.id.to_string(),
            display_name: user.name.unwrap_or_else(|| user.login.clone()),
            avatar_url: user.avatar_url.unwrap_or_default(),
            nickname: user.login,
            callback_nonce: Some(state.to_string()),
        })
    }
}
