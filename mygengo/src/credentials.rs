use std::fmt;

/// API key pair of a myGengo account.
///
/// The private key never leaves the client, it is only used to compute `api_sig`.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub(crate) private_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            private_key: private_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("private_key", &"***")
            .finish()
    }
}
