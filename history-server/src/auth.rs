use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use history_types::{HistoryError, User};

const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClerkSessionClaims {
    pub iss: String,         // Issuer, the Clerk frontend API
    pub sub: String,         // Clerk user ID
    pub exp: u64,            // Expiry
    pub iat: Option<u64>,    // Issued at
    pub sid: Option<String>, // Clerk session ID
    pub azp: Option<String>, // Authorized party (origin of the client)
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksKey {
    pub kty: String,
    pub kid: String,
    pub n: Option<String>,
    pub e: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksResponse {
    pub keys: Vec<JwksKey>,
}

/// Extracts the frontend API host from a Clerk publishable key.
///
/// Keys look like `pk_test_<base64>` or `pk_live_<base64>`, where the payload
/// decodes to the host followed by a `$` terminator.
pub fn frontend_api_from_publishable_key(key: &str) -> Result<String, AuthError> {
    let parts: Vec<&str> = key.trim().splitn(3, '_').collect();
    let [prefix, environment, payload] = parts.as_slice() else {
        return Err(AuthError::InvalidPublishableKey);
    };
    if *prefix != "pk" || !matches!(*environment, "test" | "live") {
        return Err(AuthError::InvalidPublishableKey);
    }

    let trimmed = payload.trim_end_matches('=');
    let decoded = base64::engine::general_purpose::STANDARD_NO_PAD
        .decode(trimmed)
        .map_err(|e| {
            tracing::warn!("Failed to decode publishable key payload: {:?}", e);
            AuthError::InvalidPublishableKey
        })?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidPublishableKey)?;

    match decoded.strip_suffix('$') {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(AuthError::InvalidPublishableKey),
    }
}

fn user_from_claims(claims: ClerkSessionClaims) -> User {
    let display_name = claims
        .name
        .clone()
        .or_else(|| claims.first_name.clone())
        .or_else(|| claims.email.clone())
        .unwrap_or_else(|| claims.sub.clone());

    User {
        id: claims.sub,
        email: claims.email,
        first_name: claims.first_name,
        display_name,
    }
}

pub struct AuthService {
    client: Client,
    jwks_cache: Arc<RwLock<HashMap<String, (DecodingKey, SystemTime)>>>,
    frontend_api: String,
    dev_mode: bool,
}

impl AuthService {
    pub fn new(frontend_api: String) -> Self {
        Self {
            client: Client::new(),
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
            frontend_api,
            dev_mode: false,
        }
    }

    pub fn from_publishable_key(key: &str) -> Result<Self, AuthError> {
        let frontend_api = frontend_api_from_publishable_key(key)?;
        tracing::info!("Validating Clerk sessions issued by {}", frontend_api);
        Ok(Self::new(frontend_api))
    }

    pub fn new_dev_mode() -> Self {
        Self {
            client: Client::new(),
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
            frontend_api: "dev".to_string(),
            dev_mode: true,
        }
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }

    fn issuer(&self) -> String {
        format!("https://{}", self.frontend_api)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        if self.dev_mode {
            return self.validate_dev_token(token);
        }

        let header = decode_header(token).map_err(|e| {
            tracing::warn!("Failed to decode JWT header: {:?}", e);
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or_else(|| {
            tracing::warn!("JWT header missing 'kid' field");
            AuthError::InvalidToken
        })?;

        let decoding_key = self.get_decoding_key(&kid).await?;

        // Clerk session tokens carry no audience
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_aud = false;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.issuer()]);

        let token_data = decode::<ClerkSessionClaims>(token, &decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AuthError::IssuerMismatch,
                _ => {
                    tracing::warn!("JWT token validation failed for kid {}: {:?}", kid, e);
                    AuthError::InvalidToken
                }
            })?;

        let claims = token_data.claims;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        if claims.exp < now {
            tracing::warn!("Token expired: exp={}, now={}", claims.exp, now);
            return Err(AuthError::TokenExpired);
        }

        tracing::debug!("Validated session {:?} for {}", claims.sid, claims.sub);
        Ok(user_from_claims(claims))
    }

    async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some((key, cached_time)) = cache.get(kid) {
                let elapsed = cached_time.elapsed().unwrap_or(JWKS_CACHE_TTL);
                if elapsed < JWKS_CACHE_TTL {
                    tracing::debug!("Using cached decoding key for kid '{}'", kid);
                    return Ok(key.clone());
                }
                tracing::debug!("Cached key for kid '{}' is stale, refetching", kid);
            }
        }

        let jwks_url = format!("{}/.well-known/jwks.json", self.issuer());
        tracing::debug!("Fetching JWKS from {}", jwks_url);

        let response = self.client.get(&jwks_url).send().await.map_err(|e| {
            tracing::warn!("Failed to fetch JWKS: {:?}", e);
            AuthError::JwksFetchError
        })?;

        if !response.status().is_success() {
            tracing::warn!("JWKS fetch returned status: {}", response.status());
            return Err(AuthError::JwksFetchError);
        }

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse JWKS JSON: {:?}", e);
            AuthError::JwksFetchError
        })?;

        let jwks_key = jwks.keys.iter().find(|key| key.kid == kid).ok_or_else(|| {
            tracing::warn!("Key with kid '{}' not found in JWKS", kid);
            AuthError::KeyNotFound
        })?;

        let decoding_key = match (&jwks_key.n, &jwks_key.e) {
            (Some(n), Some(e)) => DecodingKey::from_rsa_components(n, e)?,
            _ => {
                tracing::warn!("JWKS key '{}' has no RSA n,e components", kid);
                return Err(AuthError::InvalidKey);
            }
        };

        {
            let mut cache = self.jwks_cache.write().await;
            cache.insert(kid.to_string(), (decoding_key.clone(), SystemTime::now()));
        }

        Ok(decoding_key)
    }

    /// Dev mode: accepts an unsigned JWT payload or `user_id:email:name`
    fn validate_dev_token(&self, token: &str) -> Result<User, AuthError> {
        tracing::debug!(
            "Validating dev token (first 20 chars): {}",
            token.chars().take(20).collect::<String>()
        );

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 && !token.contains(':') {
            let payload_bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
                .decode(parts[1].trim_end_matches('='))
                .map_err(|e| {
                    tracing::warn!("Failed to decode JWT payload in dev mode: {:?}", e);
                    AuthError::InvalidToken
                })?;

            let claims: ClerkSessionClaims =
                serde_json::from_slice(&payload_bytes).map_err(|e| {
                    tracing::warn!("Failed to parse JWT claims in dev mode: {:?}", e);
                    AuthError::InvalidToken
                })?;

            return Ok(user_from_claims(claims));
        }

        let fields: Vec<&str> = token.splitn(3, ':').collect();
        match fields.as_slice() {
            [id, email, name] if !id.is_empty() => Ok(User {
                id: id.to_string(),
                email: Some(email.to_string()).filter(|email| !email.is_empty()),
                first_name: Some(name.to_string()).filter(|name| !name.is_empty()),
                display_name: name.to_string(),
            }),
            _ => Err(AuthError::InvalidToken),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Failed to fetch JWKS")]
    JwksFetchError,
    #[error("Key not found")]
    KeyNotFound,
    #[error("Invalid key")]
    InvalidKey,
    #[error("Issuer mismatch")]
    IssuerMismatch,
    #[error("Invalid publishable key")]
    InvalidPublishableKey,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidKey
    }
}

impl From<AuthError> for HistoryError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenExpired => HistoryError::SessionExpired,
            AuthError::InvalidToken
            | AuthError::KeyNotFound
            | AuthError::InvalidKey
            | AuthError::IssuerMismatch => HistoryError::InvalidToken,
            AuthError::JwksFetchError | AuthError::InvalidPublishableKey => {
                HistoryError::InternalError {
                    message: error.to_string(),
                }
            }
        }
    }
}
