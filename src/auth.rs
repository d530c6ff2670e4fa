//! # Authentication
//!
//! Cookie sessions and password hashing.
//!
//! A session is the caller's `{userId, name, email}` plus an expiry, sealed with AES-256-GCM and
//! stored base64url-encoded in the `session` cookie. There is no server-side session store: a
//! cookie that fails to open (tampered, expired, issued under another key) is simply no session.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, HeaderValue, header::COOKIE, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::AppConfig;
use crate::crypto::{CryptoError, CryptoKey, decrypt_bytes, encrypt_bytes};
use crate::error::{ApiError, unauthorized};
use crate::server::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Lifetime of a session, both as cookie `Max-Age` and as the sealed expiry.
pub const SESSION_TTL_DAYS: i64 = 7;

const SESSION_AAD: &[u8] = b"csa-loop-session";

/// Identity of a logged-in caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "山田 花子")]
    pub name: String,
    #[schema(example = "hanako@example.com")]
    pub email: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    user_id: i32,
    name: String,
    email: String,
    /// Unix seconds
    expires_at: i64,
}

/// Seals sessions into cookies and opens them again.
#[derive(Debug, Clone)]
pub struct SessionCodec {
    key: CryptoKey,
    secure: bool,
}

impl SessionCodec {
    /// `secure` adds the `Secure` attribute to issued cookies.
    pub fn new(key: CryptoKey, secure: bool) -> Self {
        Self { key, secure }
    }

    /// Builds the codec from the validated configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, CryptoError> {
        let key_bytes = config
            .session_key
            .clone()
            .ok_or(CryptoError::InvalidKeyLength(0))?;
        Ok(Self::new(CryptoKey::new(key_bytes)?, config.is_production()))
    }

    /// Seals `session` into an opaque cookie value valid for [`SESSION_TTL_DAYS`].
    pub fn seal(&self, session: &Session) -> Result<String, CryptoError> {
        self.seal_until(session, Utc::now().timestamp() + SESSION_TTL_DAYS * 86_400)
    }

    fn seal_until(&self, session: &Session, expires_at: i64) -> Result<String, CryptoError> {
        let payload = SessionPayload {
            user_id: session.user_id,
            name: session.name.clone(),
            email: session.email.clone(),
            expires_at,
        };
        let plaintext = serde_json::to_vec(&payload)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        let sealed = encrypt_bytes(&self.key, SESSION_AAD, &plaintext)?;
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Opens a cookie value, returning `None` for anything tampered, expired or malformed.
    pub fn open(&self, value: &str) -> Option<Session> {
        self.open_at(value, Utc::now().timestamp())
    }

    fn open_at(&self, value: &str, now: i64) -> Option<Session> {
        let sealed = URL_SAFE_NO_PAD.decode(value.trim()).ok()?;
        let plaintext = match decrypt_bytes(&self.key, SESSION_AAD, &sealed) {
            Ok(plaintext) => plaintext,
            Err(err) => {
                tracing::debug!(error = %err, "Rejected session cookie");
                return None;
            }
        };
        let payload: SessionPayload = serde_json::from_slice(&plaintext).ok()?;
        if payload.expires_at <= now {
            tracing::debug!(user_id = payload.user_id, "Session cookie expired");
            return None;
        }

        Some(Session {
            user_id: payload.user_id,
            name: payload.name,
            email: payload.email,
        })
    }

    /// Reads the session from the request's `Cookie` headers.
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .filter(|cookie| cookie.name() == SESSION_COOKIE)
            .find_map(|cookie| self.open(cookie.value()))
    }

    /// `Set-Cookie` value issuing `session` for seven days.
    pub fn session_cookie(&self, session: &Session) -> Result<HeaderValue, ApiError> {
        let value = self.seal(session).map_err(|err| {
            ApiError::from(anyhow::Error::new(err).context("failed to seal session cookie"))
        })?;

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::days(SESSION_TTL_DAYS))
            .build();

        HeaderValue::from_str(&cookie.to_string())
            .map_err(|err| anyhow::Error::new(err).context("invalid session cookie").into())
    }

    /// `Set-Cookie` value clearing `session`.
    pub fn removal_cookie(&self) -> HeaderValue {
        let cookie = Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::ZERO)
            .build();

        HeaderValue::from_str(&cookie.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("session=; Path=/; Max-Age=0"))
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

impl FromRef<AppState> for Arc<SessionCodec> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.sessions)
    }
}

/// Extractor for routes that require a logged-in caller; rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Session);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<SessionCodec>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = Arc::<SessionCodec>::from_ref(state);
        codec
            .from_headers(&parts.headers)
            .map(CurrentUser)
            .ok_or_else(|| unauthorized(Some("login required")))
    }
}

/// Extractor resolving the caller if there is one; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeUser
where
    Arc<SessionCodec>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let codec = Arc::<SessionCodec>::from_ref(state);
        Ok(MaybeUser(codec.from_headers(&parts.headers)))
    }
}

/// Hashes a password with bcrypt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Checks a password against a stored bcrypt hash; malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn codec() -> SessionCodec {
        SessionCodec::new(CryptoKey::new(vec![9u8; 32]).unwrap(), false)
    }

    fn hanako() -> Session {
        Session {
            user_id: 3,
            name: "Hanako".to_string(),
            email: "hanako@example.com".to_string(),
        }
    }

    #[test]
    fn seal_and_open_session() {
        let codec = codec();
        let value = codec.seal(&hanako()).unwrap();

        assert!(!value.contains("hanako"));
        assert_eq!(codec.open(&value), Some(hanako()));
    }

    #[test]
    fn tampered_cookie_is_no_session() {
        let codec = codec();
        let value = codec.seal(&hanako()).unwrap();

        let mut bytes = URL_SAFE_NO_PAD.decode(&value).unwrap();
        let middle = bytes.len() / 2;
        bytes[middle] ^= 0x40;
        let tampered = URL_SAFE_NO_PAD.encode(bytes);

        assert_eq!(codec.open(&tampered), None);
        assert_eq!(codec.open("not base64 !!"), None);
        assert_eq!(
            codec.open(&URL_SAFE_NO_PAD.encode(br#"{"userId":3,"name":"x","email":"y"}"#)),
            None
        );
    }

    #[test]
    fn cookie_from_other_key_is_no_session() {
        let value = codec().seal(&hanako()).unwrap();
        let other = SessionCodec::new(CryptoKey::new(vec![1u8; 32]).unwrap(), false);

        assert_eq!(other.open(&value), None);
    }

    #[test]
    fn expired_session_is_no_session() {
        let codec = codec();
        let now = Utc::now().timestamp();
        let value = codec.seal_until(&hanako(), now - 1).unwrap();

        assert_eq!(codec.open_at(&value, now), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let header = codec().session_cookie(&hanako()).unwrap();
        let text = header.to_str().unwrap();

        assert!(text.starts_with("session="));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("Path=/"));
        assert!(text.contains("SameSite=Lax"));
        assert!(text.contains("Max-Age=604800"));
        assert!(!text.contains("Secure"));

        let secure = SessionCodec::new(CryptoKey::new(vec![9u8; 32]).unwrap(), true);
        let header = secure.session_cookie(&hanako()).unwrap();
        assert!(header.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let header = codec().removal_cookie();
        let text = header.to_str().unwrap();

        assert!(text.starts_with("session=;"));
        assert!(text.contains("Max-Age=0"));
    }

    #[test]
    fn session_read_from_cookie_header_among_others() {
        let codec = codec();
        let value = codec.seal(&hanako()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; session={value}; lang=ja")).unwrap(),
        );

        assert_eq!(codec.from_headers(&headers), Some(hanako()));
        assert_eq!(codec.from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse", 4).unwrap();

        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-bcrypt-hash"));
    }

    async fn call(codec: Arc<SessionCodec>, cookie: Option<String>) -> StatusCode {
        async fn protected(CurrentUser(session): CurrentUser) -> String {
            session.email
        }

        let mut request = Request::builder().uri("/protected");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        Router::new()
            .route("/protected", get(protected))
            .with_state(codec)
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn current_user_extractor() {
        let codec = Arc::new(codec());
        let value = codec.seal(&hanako()).unwrap();

        assert_eq!(
            call(Arc::clone(&codec), None).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            call(Arc::clone(&codec), Some("session=garbage".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            call(codec, Some(format!("session={value}"))).await,
            StatusCode::OK
        );
    }
}
