use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::RelayError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const ASSERTION_LIFETIME_SECS: i64 = 3600;
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google service-account identity able to mint OAuth access tokens.
pub struct ServiceAccountKey {
    client_email: String,
    key: EncodingKey,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

impl ServiceAccountKey {
    /// Dashboards store the PEM on one line with literal `\n` sequences.
    pub fn new(
        client_email: Option<&str>,
        private_key: Option<&str>,
    ) -> Result<Self, RelayError> {
        let client_email = client_email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                RelayError::AuthFailure("missing service account email".to_string())
            })?;
        let private_key = private_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                RelayError::AuthFailure("missing service account private key".to_string())
            })?
            .replace("\\n", "\n");

        let key = EncodingKey::from_rsa_pem(private_key.as_bytes()).map_err(|e| {
            RelayError::AuthFailure(format!("invalid service account private key: {}", e))
        })?;

        Ok(ServiceAccountKey {
            client_email: client_email.to_string(),
            key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn signed_assertion(&self, scope: &str, audience: &str) -> Result<String, RelayError> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: audience.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| RelayError::AuthFailure(format!("could not sign assertion: {}", e)))
    }

    /// Exchanges a signed assertion for a bearer token. Failures here are
    /// provider side and reported as `AppendFailed`.
    pub async fn access_token(
        &self,
        client: &Client,
        token_url: &str,
        scope: &str,
    ) -> Result<String, RelayError> {
        let assertion = self.signed_assertion(scope, token_url)?;

        let res = client
            .post(token_url)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| RelayError::AppendFailed(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let message = match res.json::<TokenErrorResponse>().await {
                Ok(json) => json.error_description.or(json.error),
                Err(_) => None,
            };
            return Err(RelayError::AppendFailed(
                message.unwrap_or_else(|| format!("token exchange failed with {}", status)),
            ));
        }

        res.json::<TokenResponse>()
            .await
            .map(|t| t.access_token)
            .map_err(|e| RelayError::AppendFailed(e.to_string()))
    }
}
