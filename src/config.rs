/// Configuration management for Kumano
use crate::error::{KumanoError, KumanoResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub oauth: OAuthConfig,
    pub email: Option<EmailConfig>,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Externally visible base URL, used in invitation links and callbacks
    pub public_url: String,
    /// "development" or "production"
    pub environment: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub database: PathBuf,
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_seconds: i64,
    pub secure_cookie: bool,
}

/// External identity providers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub github: Option<OAuthProviderConfig>,
}

/// Credentials for a single OAuth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from_address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> KumanoResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("KUMANO_HOSTNAME").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("KUMANO_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| KumanoError::Config("Invalid port number".to_string()))?;
        let public_url = env::var("KUMANO_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", hostname, port));
        let environment = env::var("KUMANO_ENV").unwrap_or_else(|_| "development".to_string());

        let data_directory: PathBuf = env::var("KUMANO_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let database = env::var("KUMANO_DATABASE_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("kumano.sqlite"));

        let cookie_name =
            env::var("KUMANO_SESSION_COOKIE").unwrap_or_else(|_| "_kumano_session".to_string());
        let ttl_seconds = env::var("KUMANO_SESSION_TTL")
            .unwrap_or_else(|_| "1209600".to_string())
            .parse()
            .map_err(|_| KumanoError::Config("Invalid session TTL".to_string()))?;
        let secure_cookie = environment == "production";

        let github = match (env::var("GITHUB_KEY"), env::var("GITHUB_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(OAuthProviderConfig {
                client_id,
                client_secret,
                callback_url: format!("{}/auth/github/callback", public_url),
            }),
            _ => None,
        };

        let email = if let Ok(smtp_url) = env::var("KUMANO_SMTP_URL") {
            Some(EmailConfig {
                smtp_url,
                from_address: env::var("KUMANO_EMAIL_FROM_ADDRESS")
                    .unwrap_or_else(|_| format!("noreply@{}", hostname)),
            })
        } else {
            None
        };

        let level = env::var("RUST_LOG").unwrap_or_else(|_| "kumano=debug,tower_http=debug".to_string());
        let json = env::var("KUMANO_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                public_url,
                environment,
            },
            storage: StorageConfig {
                data_directory,
                database,
            },
            session: SessionConfig {
                cookie_name,
                ttl_seconds,
                secure_cookie,
            },
            oauth: OAuthConfig { github },
            email,
            logging: LoggingConfig { level, json },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> KumanoResult<()> {
        if self.service.hostname.is_empty() {
            return Err(KumanoError::Config("Hostname cannot be empty".to_string()));
        }

        if self.session.ttl_seconds <= 0 {
            return Err(KumanoError::Config(
                "Session TTL must be a positive number of seconds".to_string(),
            ));
        }

        if self.oauth.github.is_none() {
            tracing::warn!("No identity provider configured, nobody will be able to log in");
        }

        Ok(())
    }

    /// Link a placeholder account's invitation token to its redemption page
    pub fn invitation_url(&self, token: &str) -> String {
        format!(
            "{}/auth/invitation/{}",
            self.service.public_url.trim_end_matches('/'),
            token
        )
    }

    /// Settings used by tests
    pub fn for_tests(database: PathBuf) -> Self {
        Self {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 3000,
                public_url: "http://localhost:3000".to_string(),
                environment: "test".to_string(),
            },
            storage: StorageConfig {
                data_directory: database
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./data")),
                database,
            },
            session: SessionConfig {
                cookie_name: "_kumano_session".to_string(),
                ttl_seconds: 3600,
                secure_cookie: false,
            },
            oauth: OAuthConfig::default(),
            email: None,
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: false,
            },
        }
    }
}
