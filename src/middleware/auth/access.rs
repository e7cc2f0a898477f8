//! Bearer token 検証 → AuthCtx を extensions に入れる
//!
//! This layer never rejects a request. A missing header, a token that fails
//! to parse, or a subject the credential store does not know all leave the
//! request unauthenticated; the authorize layer decides what that means for
//! the route. Roles are read from the store on every request, so a role
//! change takes effect on the next request even with an old token.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::repos::user_repo::UserStore;
use crate::services::auth::{TokenCodec, TokenError};

/// Token codec + credential store, shared by every request.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    /// Resolve the principal for a request, if any.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Option<AuthCtx> {
        let token = bearer_token(headers)?;

        let verified = match self.tokens.parse(token) {
            Ok(verified) => verified,
            Err(err) => {
                log_token_failure(&err);
                return None;
            }
        };

        match self.users.find_by_email(&verified.subject).await {
            Ok(Some(user)) => Some(AuthCtx::from(user)),
            Ok(None) => {
                tracing::warn!("token subject not found in credential store");
                None
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    backend = self.users.backend_name(),
                    "credential store lookup failed"
                );
                None
            }
        }
    }
}

fn log_token_failure(err: &TokenError) {
    match err {
        TokenError::Expired => tracing::warn!("access token expired"),
        TokenError::InvalidSignature => tracing::warn!("access token signature mismatch"),
        other => tracing::warn!(error = %other, "access token rejected"),
    }
}

/// `Authorization: Bearer <token>` (scheme in any case); anything else counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    // auth-scheme is case-insensitive (RFC 9110 11.1)
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// 全ルートに認証 (principal の付与) を掛ける。
///
/// 例：
/// ```ignore
/// let router = middleware::auth::authorize::apply(router, policy);
/// let router = middleware::auth::access::apply(router, authenticator);
/// ```
///
/// authorize より外側 (後に layer) に置くこと。
pub fn apply<S>(router: Router<S>, authenticator: Arc<Authenticator>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(
        authenticator,
        access_middleware,
    ))
}

async fn access_middleware(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // a principal set by anything upstream is not trusted
    req.extensions_mut().remove::<AuthCtx>();

    if let Some(auth_ctx) = authenticator.authenticate(req.headers()).await {
        tracing::debug!(user_id = %auth_ctx.user_id, "request authenticated");
        // middleware → extractor への受け渡し
        req.extensions_mut().insert(auth_ctx);
    }

    next.run(req).await
}
