use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks email confirmation links.
///
/// The token is bound to the user id and the email, so changing either
/// invalidates outstanding links.
#[derive(Clone)]
pub struct ConfirmationSigner {
    secret: Vec<u8>,
}

impl ConfirmationSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self, user_id: Uuid, email: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any size"));
        mac.update(b"email-confirmation:");
        mac.update(user_id.as_bytes());
        mac.update(b":");
        mac.update(email.to_lowercase().as_bytes());
        mac
    }

    pub fn token_hash(&self, user_id: Uuid, email: &str) -> String {
        hex::encode(self.mac(user_id, email).finalize().into_bytes())
    }

    pub fn verify(&self, user_id: Uuid, email: &str, token_hash: &str) -> bool {
        let Ok(expected) = hex::decode(token_hash) else {
            return false;
        };
        self.mac(user_id, email).verify_slice(&expected).is_ok()
    }

    pub fn confirmation_path(&self, user_id: Uuid, email: &str) -> String {
        format!(
            "/auth/confirm?user_id={}&token_hash={}",
            user_id,
            self.token_hash(user_id, email)
        )
    }
}
