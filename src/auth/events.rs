use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use uuid::Uuid;

use crate::db::enums::UserType;
use crate::db::models::auth::AuthUser;

/// Session-change notifications, named the way clients receive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// Callback invoked with the event and the session user after the event applied.
pub type AuthHandler = Arc<dyn Fn(AuthEvent, Option<&AuthUser>) + Send + Sync>;

pub fn auth_handler<F>(f: F) -> AuthHandler
where
    F: Fn(AuthEvent, Option<&AuthUser>) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Capability handed to anything that needs the caller's role or its session changes.
pub trait AuthContext {
    fn current_user_type(&self) -> Option<UserType>;

    fn subscribe(&self, handler: AuthHandler) -> Subscription;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct ProviderInner {
    user: RwLock<Option<AuthUser>>,
    handlers: Mutex<HashMap<u64, AuthHandler>>,
    next_id: AtomicU64,
}

/// Auth state of one session plus its subscribers.
#[derive(Clone, Default)]
pub struct AuthProvider {
    inner: Arc<ProviderInner>,
}

impl AuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: AuthUser) -> Self {
        let provider = Self::default();
        *provider
            .inner
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(user);
        provider
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner
            .user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner.handlers).len()
    }

    /// Applies `event` to the provider state and notifies every subscriber.
    ///
    /// `SIGNED_OUT` clears the user; other events replace it when `user` is given.
    /// Handlers run after the registry lock is released, so they may subscribe
    /// or drop subscriptions themselves.
    pub fn emit(&self, event: AuthEvent, user: Option<AuthUser>) {
        let current = {
            let mut state = self
                .inner
                .user
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            match event {
                AuthEvent::SignedOut => *state = None,
                _ => {
                    if user.is_some() {
                        *state = user;
                    }
                }
            }
            state.clone()
        };

        let handlers: Vec<AuthHandler> = lock(&self.inner.handlers).values().cloned().collect();
        tracing::debug!(?event, subscribers = handlers.len(), "Dispatching auth event");
        for handler in handlers {
            handler(event, current.as_ref());
        }
    }
}

impl AuthContext for AuthProvider {
    fn current_user_type(&self) -> Option<UserType> {
        self.current_user().and_then(|user| user.user_type)
    }

    fn subscribe(&self, handler: AuthHandler) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.handlers).insert(id, handler);
        Subscription {
            id,
            provider: Arc::downgrade(&self.inner),
        }
    }
}

/// Registration guard; the handler is removed when this is dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    provider: Weak<ProviderInner>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.provider.upgrade() {
            lock(&inner.handlers).remove(&self.id);
        }
    }
}

/// Process-wide registry of live session providers, keyed by token id.
#[derive(Clone, Default)]
pub struct AuthHub {
    providers: Arc<RwLock<HashMap<String, AuthProvider>>>,
}

impl AuthHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// One session's view of the hub, usable wherever an [`AuthContext`] is expected.
    pub fn session<'a>(&'a self, session_id: &'a str, user: &'a AuthUser) -> HubSession<'a> {
        HubSession {
            hub: self,
            session_id,
            user,
        }
    }

    /// Subscribes to a session, creating its provider on first use.
    ///
    /// Runs under the registry write lock, the same lock `release` takes, so a
    /// provider is never dropped between being found and gaining the subscriber.
    pub fn subscribe(&self, session_id: &str, user: &AuthUser, handler: AuthHandler) -> Subscription {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session_id.to_string())
            .or_insert_with(|| AuthProvider::with_user(user.clone()))
            .subscribe(handler)
    }

    pub fn current_user(&self, session_id: &str) -> Option<Option<AuthUser>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .map(AuthProvider::current_user)
    }

    /// Delivers an event to one session. Returns false when nobody holds that session.
    pub fn publish(&self, session_id: &str, event: AuthEvent, user: Option<AuthUser>) -> bool {
        let provider = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .cloned();

        match provider {
            Some(provider) => {
                provider.emit(event, user);
                if event == AuthEvent::SignedOut {
                    self.release(session_id);
                }
                true
            }
            None => false,
        }
    }

    /// Delivers an event to every live session of a user; returns how many were notified.
    pub fn publish_to_user(&self, user_id: Uuid, event: AuthEvent, user: Option<AuthUser>) -> usize {
        let targets: Vec<AuthProvider> = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|provider| {
                provider
                    .current_user()
                    .is_some_and(|current| current.id == user_id)
            })
            .cloned()
            .collect();

        for provider in &targets {
            provider.emit(event, user.clone());
        }
        targets.len()
    }

    /// Forgets a session provider once it has no subscribers left.
    pub fn release(&self, session_id: &str) {
        let mut providers = self
            .providers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if providers
            .get(session_id)
            .is_some_and(|provider| provider.subscriber_count() == 0)
        {
            providers.remove(session_id);
        }
    }

    pub fn len(&self) -> usize {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Session-scoped handle returned by [`AuthHub::session`].
pub struct HubSession<'a> {
    hub: &'a AuthHub,
    session_id: &'a str,
    user: &'a AuthUser,
}

impl AuthContext for HubSession<'_> {
    /// The provider's view once the session is registered, else the session user.
    fn current_user_type(&self) -> Option<UserType> {
        match self.hub.current_user(self.session_id) {
            Some(current) => current.and_then(|user| user.user_type),
            None => self.user.user_type,
        }
    }

    fn subscribe(&self, handler: AuthHandler) -> Subscription {
        self.hub.subscribe(self.session_id, self.user, handler)
    }
}
