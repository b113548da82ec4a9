use axum::{
    Router,
    extract::State,
    http::Request,
    middleware::{Next, from_fn_with_state},
    response::{IntoResponse, Redirect, Response},
};

use crate::db::{enums::UserType, models::auth::AuthUser};
use crate::middleware::auth::ResolvedSession;
use crate::routes::paths;

/// Precondition a route group places on the caller's session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessRule {
    Authenticated,
    Role(UserType),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(&'static str),
}

impl AccessRule {
    /// Fails closed: no session, or a session without a role where one is
    /// required, goes to login; a different role goes to the dashboard.
    pub fn evaluate(&self, user: Option<&AuthUser>) -> Access {
        let Some(user) = user else {
            return Access::Redirect(paths::LOGIN);
        };

        match self {
            AccessRule::Authenticated => Access::Granted,
            AccessRule::Role(required) => match user.user_type {
                Some(actual) if actual == *required => Access::Granted,
                Some(_) => Access::Redirect(paths::DASHBOARD),
                None => Access::Redirect(paths::LOGIN),
            },
        }
    }
}

pub async fn require_access(
    State(rule): State<AccessRule>,
    request: Request<axum::body::Body>,
    next: Next<axum::body::Body>,
) -> Response {
    let user = request
        .extensions()
        .get::<ResolvedSession>()
        .and_then(|resolved| resolved.0.as_ref())
        .map(|session| &session.user);

    match rule.evaluate(user) {
        Access::Granted => next.run(request).await,
        Access::Redirect(target) => {
            tracing::info!(
                path = %request.uri().path(),
                rule = ?rule,
                redirect = target,
                "Access gate redirect"
            );
            Redirect::to(target).into_response()
        }
    }
}

/// Wraps every route of `router` in the gate for `rule`.
pub fn protect<S>(router: Router<S>, rule: AccessRule) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn_with_state(rule, require_access))
}
