use pledgekit::auth::{
    AuthContext, AuthEvent, AuthHub, AuthListener, ConfirmationSigner, Navigator,
};
use pledgekit::db::enums::UserType;
use pledgekit::middleware::gate::{Access, AccessRule};
use std::sync::{Arc, Mutex};

use crate::test_user;

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.visits.lock().unwrap().push(route.to_string());
    }
}

#[test]
fn hub_sign_out_drives_listener_once() {
    let hub = AuthHub::new();
    let user = test_user(Some(UserType::User));
    let context = hub.session("session-1", &user);
    assert_eq!(context.current_user_type(), Some(UserType::User));

    let navigator = Arc::new(RecordingNavigator::default());
    let listener = AuthListener::mount(&context, navigator.clone());

    assert!(hub.publish("session-1", AuthEvent::UserUpdated, None));
    assert!(navigator.visits.lock().unwrap().is_empty());

    assert!(hub.publish("session-1", AuthEvent::SignedOut, None));
    assert_eq!(*navigator.visits.lock().unwrap(), vec!["/login".to_string()]);
    assert_eq!(context.current_user_type(), None);

    drop(listener);
    hub.release("session-1");
    assert!(hub.is_empty());
    assert!(!hub.publish("session-1", AuthEvent::SignedOut, None));
    assert_eq!(navigator.visits.lock().unwrap().len(), 1);
}

#[test]
fn reconnect_on_same_session_still_receives_sign_out() {
    let hub = AuthHub::new();
    let user = test_user(Some(UserType::Company));

    let first_tab = Arc::new(RecordingNavigator::default());
    let first = AuthListener::mount(&hub.session("session-2", &user), first_tab.clone());
    let second_tab = Arc::new(RecordingNavigator::default());
    let second = AuthListener::mount(&hub.session("session-2", &user), second_tab.clone());

    drop(first);
    hub.release("session-2");

    assert!(hub.publish("session-2", AuthEvent::SignedOut, None));
    assert!(first_tab.visits.lock().unwrap().is_empty());
    assert_eq!(*second_tab.visits.lock().unwrap(), vec!["/login".to_string()]);
    drop(second);
}

#[test]
fn gate_property_holds_for_all_role_pairs() {
    for required in UserType::ALL {
        for actual in UserType::ALL {
            let user = test_user(Some(actual));
            let access = AccessRule::Role(required).evaluate(Some(&user));
            if actual == required {
                assert_eq!(access, Access::Granted);
            } else {
                assert_eq!(access, Access::Redirect("/dashboard"));
            }
        }
    }
}

#[test]
fn confirmation_tokens_bind_user_and_email() {
    let signer = ConfirmationSigner::new("integration-secret-integration-secret");
    let user = test_user(Some(UserType::User));
    let token = signer.token_hash(user.id, &user.email);

    assert!(signer.verify(user.id, &user.email, &token));
    assert!(signer.verify(user.id, &user.email.to_uppercase(), &token));
    assert!(!signer.verify(user.id, "someone-else@example.com", &token));
    assert!(!signer.verify(user.id, &user.email, &token[..token.len() - 2]));
}
