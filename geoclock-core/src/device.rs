//! Device identity
//!
//! A device is identified by a pseudo-random token persisted in the
//! local store. The token identifies a *storage profile*, not
//! hardware: clearing the store, a private browsing profile or a
//! reinstall produces a new token. That weakness is accepted (the
//! binding is a deterrent against account sharing, not a security
//! boundary), and the trait seam below is where a hardware-backed
//! identifier would be substituted.

use rand::Rng;

use shared::util::{now_millis, to_base36};

use crate::store::{LocalStore, StoreError, StoreKey};

/// Source of the stable device token.
pub trait DeviceIdentity: Send + Sync {
    /// Return the device token, creating and persisting one on first
    /// use. Stable across restarts on the same storage profile.
    fn device_token(&self) -> Result<String, StoreError>;
}

/// Store-backed device identity.
///
/// Token format: `dev_` + 9 random base36 chars + current millis in
/// base36. Opaque to callers; uniqueness is probabilistic, not
/// guaranteed.
#[derive(Debug, Clone)]
pub struct StoredDeviceIdentity {
    store: LocalStore,
}

impl StoredDeviceIdentity {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    fn generate() -> String {
        let mut rng = rand::thread_rng();
        let random: String = (0..9)
            .map(|_| {
                const CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
                CHARS[rng.gen_range(0..CHARS.len())] as char
            })
            .collect();
        format!("dev_{random}{}", to_base36(now_millis() as u64))
    }
}

impl DeviceIdentity for StoredDeviceIdentity {
    fn device_token(&self) -> Result<String, StoreError> {
        if let Some(token) = self.store.load::<String>(StoreKey::DeviceToken)? {
            return Ok(token);
        }
        let token = Self::generate();
        self.store.save(StoreKey::DeviceToken, &token)?;
        tracing::info!(token = %token, "Generated new device token");
        Ok(token)
    }
}

/// Fixed-token identity for tests and tooling.
#[derive(Debug, Clone)]
pub struct FixedDeviceIdentity(pub String);

impl DeviceIdentity for FixedDeviceIdentity {
    fn device_token(&self) -> Result<String, StoreError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_stable_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let first = {
            let store = LocalStore::open(dir.path()).unwrap();
            StoredDeviceIdentity::new(store).device_token().unwrap()
        };
        let second = {
            let store = LocalStore::open(dir.path()).unwrap();
            StoredDeviceIdentity::new(store).device_token().unwrap()
        };
        assert_eq!(first, second);
        assert!(first.starts_with("dev_"));
    }

    #[test]
    fn different_profiles_get_different_tokens() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let token_a = StoredDeviceIdentity::new(LocalStore::open(a.path()).unwrap())
            .device_token()
            .unwrap();
        let token_b = StoredDeviceIdentity::new(LocalStore::open(b.path()).unwrap())
            .device_token()
            .unwrap();
        assert_ne!(token_a, token_b);
    }
}
