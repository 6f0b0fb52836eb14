//! Secret byte wrappers shared by custody code.

use secrecy::{ExposeSecret, SecretVec};
use zeroize::Zeroize;

/// Wrapper around secret bytes that prevents accidental logging.
pub struct SecretBytes {
    inner: SecretVec<u8>,
}

impl Clone for SecretBytes {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret().to_vec())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { inner: SecretVec::new(bytes) }
    }

    pub fn from_slice(slice: &[u8]) -> Self {
        Self::new(slice.to_vec())
    }

    /// Expose secret bytes for use (explicit, auditable in code review).
    pub fn expose_secret(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Convert to owned Vec (caller responsible for zeroizing).
    pub fn expose_owned(&self) -> Vec<u8> {
        self.inner.expose_secret().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED {} bytes])", self.len())
    }
}

/// Panic-safe secret cleanup: zeroizes the held value unless it was taken.
pub struct SecretPanicGuard<T: Zeroize> {
    secret: Option<T>,
}

impl<T: Zeroize> SecretPanicGuard<T> {
    pub fn new(secret: T) -> Self {
        Self { secret: Some(secret) }
    }

    pub fn get(&self) -> &T {
        self.secret.as_ref().expect("secret already taken")
    }

    pub fn take(&mut self) -> T {
        self.secret.take().expect("secret already taken")
    }
}

impl<T: Zeroize> Drop for SecretPanicGuard<T> {
    fn drop(&mut self) {
        if let Some(secret) = &mut self.secret {
            secret.zeroize();
        }
    }
}
