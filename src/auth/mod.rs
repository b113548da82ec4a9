pub mod confirmation;
pub mod events;
pub mod listener;

pub use confirmation::ConfirmationSigner;
pub use events::{AuthContext, AuthEvent, AuthHandler, AuthHub, AuthProvider, HubSession, Subscription, auth_handler};
pub use listener::{AuthListener, Navigator};
