//! Bearer token authentication.
//!
//! Tokens are configured up front, each mapped to a user id. Revoked tokens
//! stay rejected even if they are still listed as accepted.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::debug;

use super::{AuthError, AuthRequest, Authenticator, Identity};
use crate::config::TokenEntry;

/// Validates `Authorization: Bearer <token>` against configured tokens.
pub struct BearerTokenAuthenticator {
    tokens: HashMap<String, String>,
    revoked: HashSet<String>,
}

impl BearerTokenAuthenticator {
    pub fn new(tokens: &[TokenEntry], revoked: &[String]) -> Result<Self, AuthError> {
        if tokens.is_empty() {
            return Err(AuthError::ConfigurationError(
                "bearer auth requires at least one token".to_string(),
            ));
        }
        if let Some(entry) = tokens.iter().find(|t| t.token.is_empty()) {
            return Err(AuthError::ConfigurationError(format!(
                "empty token configured for user '{}'",
                entry.user_id
            )));
        }

        Ok(Self {
            tokens: tokens
                .iter()
                .map(|t| (t.token.clone(), t.user_id.clone()))
                .collect(),
            revoked: revoked.iter().cloned().collect(),
        })
    }

    fn lookup(&self, token: &str) -> Option<&str> {
        // Compare every entry so timing does not reveal which one matched
        let mut found = None;
        for (candidate, user_id) in &self.tokens {
            if constant_time_eq(candidate.as_bytes(), token.as_bytes()) {
                found = Some(user_id.as_str());
            }
        }
        found
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let token = request.bearer_token().ok_or(AuthError::NotAuthenticated)?;

        if self.revoked.contains(token) {
            debug!("Rejected revoked token from {}", request.source_ip);
            return Err(AuthError::Revoked);
        }

        match self.lookup(token) {
            Some(user_id) => Ok(Identity::new(user_id, "bearer")),
            None => Err(AuthError::InvalidCredentials("unknown token".to_string())),
        }
    }

    fn method_name(&self) -> &'static str {
        "bearer"
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn tokens() -> Vec<TokenEntry> {
        vec![
            TokenEntry {
                token: "ash-token".to_string(),
                user_id: "ash".to_string(),
            },
            TokenEntry {
                token: "misty-token".to_string(),
                user_id: "misty".to_string(),
            },
        ]
    }

    fn request(authorization: Option<&str>) -> AuthRequest {
        AuthRequest {
            headers: authorization
                .map(|v| ("authorization".to_string(), v.to_string()))
                .into_iter()
                .collect(),
            source_ip: IpAddr::from([127, 0, 0, 1]),
        }
    }

    #[tokio::test]
    async fn test_valid_tokens_map_to_users() {
        let auth = BearerTokenAuthenticator::new(&tokens(), &[]).unwrap();

        let ash = auth.authenticate(&request(Some("Bearer ash-token"))).await.unwrap();
        assert_eq!(ash, Identity::new("ash", "bearer"));

        let misty = auth
            .authenticate(&request(Some("bearer misty-token")))
            .await
            .unwrap();
        assert_eq!(misty.user_id, "misty");
    }

    #[tokio::test]
    async fn test_missing_and_unknown_tokens() {
        let auth = BearerTokenAuthenticator::new(&tokens(), &[]).unwrap();

        assert!(matches!(
            auth.authenticate(&request(None)).await,
            Err(AuthError::NotAuthenticated)
        ));
        assert!(matches!(
            auth.authenticate(&request(Some("Bearer ash-token2"))).await,
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(matches!(
            auth.authenticate(&request(Some("Basic ash-token"))).await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let auth =
            BearerTokenAuthenticator::new(&tokens(), &["misty-token".to_string()]).unwrap();

        assert!(matches!(
            auth.authenticate(&request(Some("Bearer misty-token"))).await,
            Err(AuthError::Revoked)
        ));
        assert!(auth
            .authenticate(&request(Some("Bearer ash-token")))
            .await
            .is_ok());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(matches!(
            BearerTokenAuthenticator::new(&[], &[]),
            Err(AuthError::ConfigurationError(_))
        ));

        let empty = vec![TokenEntry {
            token: String::new(),
            user_id: "brock".to_string(),
        }];
        assert!(matches!(
            BearerTokenAuthenticator::new(&empty, &[]),
            Err(AuthError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"token", b"token"));
        assert!(!constant_time_eq(b"token", b"tokex"));
        assert!(!constant_time_eq(b"token", b"toke"));
    }
}
