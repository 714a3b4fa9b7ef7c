use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// Request information for authentication.
///
/// Header names are lowercase.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

impl AuthRequest {
    /// Token from `Authorization: Bearer <token>`, scheme matched case-insensitively.
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.headers.get("authorization")?.trim();
        let (scheme, token) = value.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub method: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            method: method.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::new("anonymous", "none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(authorization: Option<&str>) -> AuthRequest {
        let mut headers = HashMap::new();
        if let Some(value) = authorization {
            headers.insert("authorization".to_string(), value.to_string());
        }
        AuthRequest {
            headers,
            source_ip: IpAddr::from([127, 0, 0, 1]),
        }
    }

    #[test]
    fn test_anonymous_identity() {
        let identity = Identity::anonymous();
        assert_eq!(identity.user_id, "anonymous");
        assert_eq!(identity.method, "none");
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(request(Some("Bearer abc")).bearer_token(), Some("abc"));
        assert_eq!(request(Some("bearer  abc ")).bearer_token(), Some("abc"));
        assert_eq!(request(Some("Basic abc")).bearer_token(), None);
        assert_eq!(request(Some("Bearer ")).bearer_token(), None);
        assert_eq!(request(Some("Bearer")).bearer_token(), None);
        assert_eq!(request(None).bearer_token(), None);
    }

    #[test]
    fn test_identity_serialization() {
        let identity = Identity::new("ash", "bearer");
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["user_id"], "ash");
        assert_eq!(json["method"], "bearer");
    }
}
