//! Caller identity resolution.
//!
//! The submitter's e-mail is looked up in a fixed order: forwarded request
//! headers first, then process environment variables, then an identity
//! service. The first candidate that looks like an e-mail address wins and is
//! returned together with the source it came from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, warn};

/// Headers set by the fronting proxy, in priority order
pub const HEADER_CANDIDATES: [&str; 5] = [
    "x-forwarded-email",
    "x-forwarded-user",
    "x-user-email",
    "x-databricks-user-email",
    "remote-user",
];

/// Environment variables consulted when no header matched, in priority order
pub const ENV_CANDIDATES: [&str; 3] = ["DATABRICKS_USER_EMAIL", "USER_EMAIL", "REMOTE_USER"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum IdentitySource {
    Header(String),
    Environment(String),
    IdentityService,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub email: String,
    pub source: IdentitySource,
}

/// Remote lookup of the current user, the last resort of the resolver
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_user_email(&self) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;
}

/// Read access to environment variables
pub trait EnvLookup: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn as_email(value: &str) -> Option<String> {
    let value = value.trim();
    if value.contains('@') {
        Some(value.to_string())
    } else {
        None
    }
}

#[derive(Clone)]
pub struct IdentityResolver {
    header_candidates: Vec<String>,
    env_candidates: Vec<String>,
    env: Arc<dyn EnvLookup>,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self {
            header_candidates: HEADER_CANDIDATES.iter().map(|h| h.to_string()).collect(),
            env_candidates: ENV_CANDIDATES.iter().map(|v| v.to_string()).collect(),
            env: Arc::new(ProcessEnv),
            provider: None,
        }
    }

    pub fn with_env(mut self, env: Arc<dyn EnvLookup>) -> Self {
        self.env = env;
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Resolve the caller, consulting `header` for request header values.
    ///
    /// Returns `None` once every source is exhausted.
    pub async fn resolve<'h, H>(&self, header: H) -> Option<ResolvedIdentity>
    where
        H: Fn(&str) -> Option<&'h str>,
    {
        if let Some(identity) = self.from_headers(header) {
            return Some(identity);
        }
        if let Some(identity) = self.from_environment() {
            return Some(identity);
        }
        self.from_identity_service().await
    }

    pub fn from_headers<'h, H>(&self, header: H) -> Option<ResolvedIdentity>
    where
        H: Fn(&str) -> Option<&'h str>,
    {
        self.header_candidates.iter().find_map(|name| {
            header(name.as_str()).and_then(as_email).map(|email| ResolvedIdentity {
                email,
                source: IdentitySource::Header(name.clone()),
            })
        })
    }

    pub fn from_environment(&self) -> Option<ResolvedIdentity> {
        self.env_candidates.iter().find_map(|name| {
            self.env
                .var(name)
                .and_then(|value| as_email(&value))
                .map(|email| ResolvedIdentity {
                    email,
                    source: IdentitySource::Environment(name.clone()),
                })
        })
    }

    pub async fn from_identity_service(&self) -> Option<ResolvedIdentity> {
        let provider = self.provider.as_ref()?;
        match provider.current_user_email().await {
            Ok(Some(value)) => {
                let email = as_email(&value);
                if email.is_none() {
                    debug!("Identity service returned a non e-mail principal");
                }
                email.map(|email| ResolvedIdentity {
                    email,
                    source: IdentitySource::IdentityService,
                })
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Identity service lookup failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Result<Option<String>, String>);

    #[async_trait]
    impl IdentityProvider for FixedProvider {
        async fn current_user_email(
            &self,
        ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
            self.0.clone().map_err(Into::into)
        }
    }

    fn env(pairs: &[(&str, &str)]) -> Arc<dyn EnvLookup> {
        Arc::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<String, String>>(),
        )
    }

    fn headers<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> {
        move |name: &str| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    #[tokio::test]
    async fn test_header_priority_order() {
        let resolver = IdentityResolver::new().with_env(env(&[]));
        let pairs = [
            ("remote-user", "late@lifeblood.example"),
            ("x-forwarded-user", "early@lifeblood.example"),
        ];
        let identity = resolver.resolve(headers(&pairs)).await.unwrap();
        assert_eq!(identity.email, "early@lifeblood.example");
        assert_eq!(
            identity.source,
            IdentitySource::Header("x-forwarded-user".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_email_header_skipped() {
        let resolver = IdentityResolver::new().with_env(env(&[]));
        let pairs = [
            ("x-forwarded-email", "service-principal-1234"),
            ("x-user-email", "jane@lifeblood.example"),
        ];
        let identity = resolver.resolve(headers(&pairs)).await.unwrap();
        assert_eq!(identity.email, "jane@lifeblood.example");
    }

    #[tokio::test]
    async fn test_environment_fallback() {
        let resolver = IdentityResolver::new().with_env(env(&[
            ("USER_EMAIL", "env@lifeblood.example"),
            ("REMOTE_USER", "remote@lifeblood.example"),
        ]));
        let identity = resolver.resolve(headers(&[])).await.unwrap();
        assert_eq!(identity.email, "env@lifeblood.example");
        assert_eq!(
            identity.source,
            IdentitySource::Environment("USER_EMAIL".to_string())
        );
    }

    #[tokio::test]
    async fn test_identity_service_last() {
        let resolver = IdentityResolver::new()
            .with_env(env(&[("USER_EMAIL", "not-an-email")]))
            .with_provider(Arc::new(FixedProvider(Ok(Some(
                "sdk@lifeblood.example".to_string(),
            )))));
        let identity = resolver.resolve(headers(&[])).await.unwrap();
        assert_eq!(identity.source, IdentitySource::IdentityService);
        assert_eq!(identity.email, "sdk@lifeblood.example");
    }

    #[tokio::test]
    async fn test_all_sources_exhausted() {
        let resolver = IdentityResolver::new()
            .with_env(env(&[]))
            .with_provider(Arc::new(FixedProvider(Err("unreachable".to_string()))));
        assert!(resolver.resolve(headers(&[])).await.is_none());

        let resolver = IdentityResolver::new()
            .with_env(env(&[]))
            .with_provider(Arc::new(FixedProvider(Ok(Some("sp-42".to_string())))));
        assert!(resolver.resolve(headers(&[])).await.is_none());
    }
}
