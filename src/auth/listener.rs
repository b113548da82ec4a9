use std::sync::Arc;

use crate::auth::events::{AuthContext, AuthEvent, Subscription, auth_handler};
use crate::routes::paths;

/// Something that can send the client elsewhere.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Sends the client to the login route whenever its session signs out.
///
/// The subscription lives exactly as long as the listener; every other event
/// is ignored.
pub struct AuthListener {
    _subscription: Subscription,
}

impl AuthListener {
    pub fn mount<C>(context: &C, navigator: Arc<dyn Navigator>) -> Self
    where
        C: AuthContext + ?Sized,
    {
        let subscription = context.subscribe(auth_handler(move |event, _| {
            if event == AuthEvent::SignedOut {
                tracing::debug!("Session signed out, redirecting to login");
                navigator.navigate(paths::LOGIN);
            }
        }));

        Self {
            _subscription: subscription,
        }
    }
}
