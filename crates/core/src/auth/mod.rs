//! Authentication for the catalog API.
//!
//! The entrypoint builds an [`AuthRequest`] from each request and asks the
//! configured [`Authenticator`] for an [`Identity`].

mod bearer;
mod none;
mod traits;
mod types;

pub use bearer::BearerTokenAuthenticator;
pub use none::NoneAuthenticator;
pub use traits::*;
pub use types::*;

use crate::config::{AuthConfig, AuthMethod};

/// Create the authenticator for the configured method.
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator)),
        AuthMethod::Bearer => Ok(Box::new(BearerTokenAuthenticator::new(
            &config.tokens,
            &config.revoked,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenEntry;

    #[test]
    fn test_create_authenticator_none() {
        let auth = create_authenticator(&AuthConfig::none()).unwrap();
        assert_eq!(auth.method_name(), "none");
    }

    #[test]
    fn test_create_authenticator_bearer() {
        let config = AuthConfig {
            method: AuthMethod::Bearer,
            tokens: vec![TokenEntry {
                token: "secret".to_string(),
                user_id: "ash".to_string(),
            }],
            revoked: Vec::new(),
        };
        let auth = create_authenticator(&config).unwrap();
        assert_eq!(auth.method_name(), "bearer");
    }

    #[test]
    fn test_create_authenticator_bearer_without_tokens() {
        let config = AuthConfig {
            method: AuthMethod::Bearer,
            ..AuthConfig::none()
        };
        let result = create_authenticator(&config);
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }
}
