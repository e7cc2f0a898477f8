//! AccessPolicy の評価 → 401 / 403 で打ち切る
//!
//! Runs after `access`: reads the principal (if any) from the extensions and
//! asks the rule table. A denied request never reaches the handler, and the
//! response never names the role that was required.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AccessPolicy, Decision};

pub fn apply<S>(router: Router<S>, policy: Arc<AccessPolicy>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(policy, authorize_middleware))
}

async fn authorize_middleware(
    State(policy): State<Arc<AccessPolicy>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // nest() strips the prefix from req.uri(); rules are written against full paths
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path())
        .unwrap_or_else(|| req.uri().path());
    let principal = req.extensions().get::<AuthCtx>();

    let decision = policy.evaluate(req.method(), path, principal.map(|p| &p.roles));

    match decision {
        Decision::Allow => Ok(next.run(req).await),
        Decision::Unauthenticated => {
            tracing::info!(method = %req.method(), path, "unauthenticated request denied");
            Err(AppError::Unauthorized)
        }
        Decision::Forbidden => {
            tracing::info!(
                method = %req.method(),
                path,
                user_id = ?principal.map(|p| p.user_id),
                "insufficient role"
            );
            Err(AppError::Forbidden)
        }
    }
}
