use crate::service::error::ApiError;
use sha2::{Digest, Sha256};

/// Rate-limit bucket key used when authentication is disabled.
const ANONYMOUS_KEY: &str = "anonymous";

pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

/// Bearer/query token check against configured SHA-256 digests. Tokens are
/// never stored; only their hashes are compared.
#[derive(Clone, Debug, Default)]
pub struct Auth {
    token_hashes: Vec<String>,
}

impl Auth {
    pub fn new(token_hashes: Vec<String>) -> Self {
        Self { token_hashes }
    }

    pub fn enabled(&self) -> bool {
        !self.token_hashes.is_empty()
    }

    /// Validate the presented token and return the rate-limit key for this
    /// caller. The bearer header wins over the query parameter.
    pub fn authorize(
        &self,
        bearer: Option<&str>,
        query_token: Option<&str>,
    ) -> Result<String, ApiError> {
        if !self.enabled() {
            return Ok(ANONYMOUS_KEY.to_owned());
        }

        let token = bearer.or(query_token).ok_or(ApiError::Auth)?;
        let hash = hash_token(token);
        if self.token_hashes.iter().any(|h| h == &hash) {
            Ok(hash)
        } else {
            Err(ApiError::Auth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_lowercase_sha256_hex() {
        assert_eq!(
            hash_token("secret"),
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );
    }

    #[test]
    fn disabled_auth_admits_everyone() {
        let auth = Auth::default();
        assert!(!auth.enabled());
        assert_eq!(auth.authorize(None, None).expect("admitted"), ANONYMOUS_KEY);
    }

    #[test]
    fn valid_bearer_token_is_admitted() {
        let auth = Auth::new(vec![hash_token("secret")]);
        let key = auth.authorize(Some("secret"), None).expect("admitted");
        assert_eq!(key, hash_token("secret"));
    }

    #[test]
    fn query_token_works_when_no_bearer() {
        let auth = Auth::new(vec![hash_token("secret")]);
        assert!(auth.authorize(None, Some("secret")).is_ok());
    }

    #[test]
    fn bearer_takes_precedence_over_query() {
        let auth = Auth::new(vec![hash_token("secret")]);
        assert!(matches!(
            auth.authorize(Some("wrong"), Some("secret")),
            Err(ApiError::Auth)
        ));
    }

    #[test]
    fn missing_token_is_rejected() {
        let auth = Auth::new(vec![hash_token("secret")]);
        assert!(matches!(auth.authorize(None, None), Err(ApiError::Auth)));
    }

    #[test]
    fn wrong_token_is_rejected() {
        let auth = Auth::new(vec![hash_token("secret")]);
        assert!(matches!(
            auth.authorize(Some("not-it"), None),
            Err(ApiError::Auth)
        ));
    }
}
