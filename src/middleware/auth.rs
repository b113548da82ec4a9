use crate::{
    AppState,
    cache::SessionStore,
    db::{enums::UserType, models::auth::AuthUser},
    error::{AppError, AppResult},
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{HeaderMap, Request, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const SESSION_COOKIE: &str = "pk_session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid, // user_id
    pub email: String,
    pub name: String,
    pub user_type: Option<UserType>,
    pub exp: u64,    // expiration time
    pub iat: u64,    // issued at
    pub jti: String, // session id
}

impl Claims {
    fn user(&self) -> AuthUser {
        AuthUser {
            id: self.sub,
            email: self.email.clone(),
            name: self.name.clone(),
            user_type: self.user_type,
        }
    }
}

pub struct IssuedToken {
    pub token: String,
    pub session_id: String,
    pub expires_in: u64,
}

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user: &AuthUser) -> AppResult<IssuedToken> {
        let now = unix_now();
        let session_id = uuid::Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            user_type: user.user_type,
            exp: now + self.ttl.as_secs(),
            iat: now,
            jti: session_id.clone(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )?;

        Ok(IssuedToken {
            token,
            session_id,
            expires_in: self.ttl.as_secs(),
        })
    }

    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::auth_expired("Session token has expired")
            }
            _ => AppError::unauthorized("Invalid session token"),
        })
    }
}

/// An authenticated caller, as established by [`resolve_session`].
#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    pub user: AuthUser,
    pub expires_at: u64,
}

/// Result of session resolution, stored in request extensions.
#[derive(Clone, Debug)]
pub struct ResolvedSession(pub Option<Session>);

/// Server-side auth accessor: verifies tokens and checks them against the session store.
#[derive(Clone)]
pub struct SessionResolver {
    tokens: TokenService,
    store: Arc<dyn SessionStore>,
}

impl SessionResolver {
    pub fn new(tokens: TokenService, store: Arc<dyn SessionStore>) -> Self {
        Self { tokens, store }
    }

    pub async fn resolve(&self, token: &str) -> AppResult<Session> {
        let claims = self.tokens.verify(token)?;
        match self.store.lookup(&claims.jti).await? {
            Some(owner) if owner == claims.sub => Ok(Session {
                id: claims.jti.clone(),
                user: claims.user(),
                expires_at: claims.exp,
            }),
            Some(_) => Err(AppError::unauthorized("Session does not belong to this user")),
            None => Err(AppError::unauthorized("Session has been revoked")),
        }
    }

    /// Issues a token for `user` and records the session.
    pub async fn start(&self, user: &AuthUser) -> AppResult<IssuedToken> {
        let issued = self.tokens.issue(user)?;
        self.store
            .insert(&issued.session_id, user.id, self.tokens.ttl())
            .await?;
        Ok(issued)
    }

    pub async fn end(&self, session: &Session) -> AppResult<()> {
        self.store.revoke(&session.id).await
    }

    pub async fn user_details(&self, token: &str) -> Option<AuthUser> {
        self.resolve(token).await.ok().map(|session| session.user)
    }

    pub async fn user_type(&self, token: &str) -> Option<UserType> {
        self.user_details(token).await.and_then(|user| user.user_type)
    }
}

/// Bearer header first, then the session cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish()
}

/// Expired, empty session cookie; adding it to a jar clears the browser copy.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

/// Resolves the caller's session once per request.
///
/// An absent or invalid session is recorded as `ResolvedSession(None)` for the
/// gate. A session store failure is not a sign-out: the request fails with the
/// store error instead of being treated as anonymous.
pub async fn resolve_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<axum::body::Body>,
    next: Next<axum::body::Body>,
) -> Response {
    let session = match extract_token(request.headers()) {
        Some(token) => match state.sessions.resolve(&token).await {
            Ok(session) => Some(session),
            Err(error) if error.class().is_auth() => {
                tracing::debug!(error = %error, class = ?error.class(), "Session rejected");
                None
            }
            Err(error) => {
                tracing::error!(error = %error, "Session lookup failed");
                return error.into_response();
            }
        },
        None => None,
    };

    request.extensions_mut().insert(ResolvedSession(session));
    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedSession>()
            .and_then(|resolved| resolved.0.clone())
            .ok_or_else(|| AppError::unauthorized("Sign in required"))
    }
}
