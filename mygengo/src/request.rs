use crate::envelope::parse_envelope;
use crate::{Client, Error};
use bytes::Bytes;
use mygengo_common::helper::now_unix_ts;
use mygengo_common::sign::{signed_form, signed_query, to_query_map};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Serializes to `{}`, for endpoints without params.
#[derive(Serialize)]
pub(crate) struct NoParams {}

impl Client {
    pub(crate) async fn get(&self, path: &str, params: &impl Serialize) -> Result<Value, Error> {
        let body = self
            .send_signed(Method::GET, path, params, self.timeout)
            .await?;
        parse_envelope(&body)
    }

    /// GET without JSON decoding, the body is returned as is.
    pub(crate) async fn get_raw(&self, path: &str) -> Result<Bytes, Error> {
        self.send_signed(Method::GET, path, &NoParams {}, self.timeout)
            .await
    }

    pub(crate) async fn post(
        &self,
        path: &str,
        params: &impl Serialize,
        timeout: Duration,
    ) -> Result<Value, Error> {
        let body = self.send_signed(Method::POST, path, params, timeout).await?;
        parse_envelope(&body)
    }

    pub(crate) async fn put(&self, path: &str, params: &impl Serialize) -> Result<Value, Error> {
        let body = self
            .send_signed(Method::PUT, path, params, self.timeout)
            .await?;
        parse_envelope(&body)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<Value, Error> {
        let body = self
            .send_signed(Method::DELETE, path, &NoParams {}, self.timeout)
            .await?;
        parse_envelope(&body)
    }

    /// Signs the request, then sends it until it succeeds or the tries run out.
    ///
    /// Only 500 and 503 are retried, with the exact same url and body: `ts` and `api_sig` are not
    /// regenerated.
    async fn send_signed(
        &self,
        method: Method,
        path: &str,
        params: &impl Serialize,
        timeout: Duration,
    ) -> Result<Bytes, Error> {
        self.throttle.wait_turn().await;

        let creds = self.credentials();
        let ts = now_unix_ts();
        let mut url = format!("{}{}", self.base_url, path);
        let body = if method == Method::POST || method == Method::PUT {
            let data = serde_json::to_value(params)
                .map_err(|e| Error::Json(format!("Couldn't encode params: {e}")))?;
            Some(signed_form(&creds.api_key, &creds.private_key, &ts, &data)?)
        } else {
            let query = signed_query(
                &creds.api_key,
                &creds.private_key,
                &ts,
                to_query_map(params)?,
            )?;
            url.push('?');
            url.push_str(&query);
            None
        };

        tracing::debug!(%method, path, "sending request");

        let mut tries_left = self.num_tries;
        loop {
            tries_left -= 1;

            let mut req = self
                .http_client
                .request(method.clone(), &url)
                .header(ACCEPT, "application/json")
                .timeout(timeout);
            if let Some(body) = &body {
                req = req
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body.clone());
            }

            let resp = req.send().await?;
            let status = resp.status();
            if status.is_success() {
                return Ok(resp.bytes().await?);
            }

            let retryable = matches!(
                status,
                StatusCode::INTERNAL_SERVER_ERROR | StatusCode::SERVICE_UNAVAILABLE
            );
            if retryable && tries_left > 0 {
                tracing::info!(
                    %status,
                    delay = ?self.retry_delay,
                    tries_left,
                    "server unavailable, trying again"
                );
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, path, "request failed");
            return Err(Error::Http { status, body });
        }
    }
}
