use crate::credentials::Credentials;
use crate::throttle::Throttle;
use bon::bon;
use std::time::Duration;

pub const PRODUCTION_URL: &str = "https://api.mygengo.com/v1/";
pub const SANDBOX_URL: &str = "https://api.sandbox.mygengo.com/v1/";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Initial attempt included.
pub const DEFAULT_NUM_TRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
// myGengo answers 503 "please wait a short while before issuing the next request" otherwise
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// myGengo API client.
///
/// Requests made through one client are spaced at least `min_request_interval` apart, also when
/// the client is shared between tasks.
pub struct Client {
    pub(crate) credentials: Credentials,
    pub(crate) http_client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) num_tries: u32,
    pub(crate) retry_delay: Duration,
    pub(crate) throttle: Throttle,
}

#[bon]
impl Client {
    #[builder(on(String, into))]
    pub fn new(
        api_key: String,
        private_key: String,
        /// Use the sandbox API rather than the real thing
        #[builder(default)]
        sandbox: bool,
        /// Overrides the url selected by `sandbox`
        base_url: Option<&str>,
        #[builder(default = DEFAULT_TIMEOUT)]
        timeout: Duration,
        /// Attempts per request when the server answers 500 or 503, 0 is treated as 1
        #[builder(default = DEFAULT_NUM_TRIES)]
        num_tries: u32,
        #[builder(default = DEFAULT_RETRY_DELAY)]
        retry_delay: Duration,
        #[builder(default = DEFAULT_MIN_REQUEST_INTERVAL)]
        min_request_interval: Duration,
    ) -> Self {
        let mut base_url = base_url
            .unwrap_or(if sandbox { SANDBOX_URL } else { PRODUCTION_URL })
            .to_owned();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            credentials: Credentials::new(api_key, private_key),
            http_client: reqwest::Client::new(),
            base_url,
            timeout,
            num_tries: num_tries.max(1),
            retry_delay,
            throttle: Throttle::new(min_request_interval),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
