//! Identity-service lookup of the calling principal over SCIM.

use async_trait::async_trait;
use lifeblood_api::IdentityProvider;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

const SCIM_ME_PATH: &str = "/api/2.0/preview/scim/v2/Me";

#[derive(Debug, Deserialize)]
struct ScimEmail {
    value: String,
    #[serde(default)]
    primary: bool,
}

#[derive(Debug, Deserialize)]
struct ScimUser {
    #[serde(rename = "userName")]
    user_name: Option<String>,
    #[serde(default)]
    emails: Vec<ScimEmail>,
}

impl ScimUser {
    /// `userName` when it is an address, otherwise the primary e-mail
    fn email(self) -> Option<String> {
        match self.user_name {
            Some(name) if name.contains('@') => Some(name),
            _ => self
                .emails
                .into_iter()
                .find(|e| e.primary && e.value.contains('@'))
                .map(|e| e.value),
        }
    }
}

/// Resolves the principal that owns the configured token.
///
/// The first successful answer is kept until [`ScimIdentityProvider::invalidate`].
pub struct ScimIdentityProvider {
    client: Client,
    endpoint: String,
    token: String,
    cached: RwLock<Option<String>>,
}

impl ScimIdentityProvider {
    pub fn new(host: &str, token: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            endpoint: scim_endpoint(host),
            token: token.to_string(),
            cached: RwLock::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forgets the cached principal; the next lookup calls the service again.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

fn scim_endpoint(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{host}{SCIM_ME_PATH}")
    } else {
        format!("https://{host}{SCIM_ME_PATH}")
    }
}

#[async_trait]
impl IdentityProvider for ScimIdentityProvider {
    async fn current_user_email(&self) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        if let Some(email) = self.cached.read().await.clone() {
            return Ok(Some(email));
        }

        let user: ScimUser = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let email = user.email();
        if let Some(email) = &email {
            debug!("Identity service resolved {email}");
            *self.cached.write().await = Some(email.clone());
        }
        Ok(email)
    }
}
