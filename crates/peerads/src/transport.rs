//! HTTP transport seam. The client only ever POSTs JSON, so that is all a
//! transport has to do; tests swap in a recording mock.

use crate::error::{PeerAdsError, Result};
use reqwest::Url;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub trait HttpTransport: Send + Sync + 'static {
    /// POSTs `body` as JSON and returns the response body. Non-2xx answers
    /// are [`PeerAdsError::Transport`] errors carrying the status.
    fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PeerAdsError::Config(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<Vec<u8>> {
        trace!(url = %url, "POST starting");
        let mut request = self.client.post(url.clone()).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            warn!(
                url = %url,
                error = %e,
                is_connect = e.is_connect(),
                is_timeout = e.is_timeout(),
                "POST failed"
            );
            PeerAdsError::transport(format!("request failed: {e}"))
        })?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "POST response");
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PeerAdsError::status(
                status.as_u16(),
                format!("HTTP {status} from {url}: {text}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PeerAdsError::transport(format!("reading body: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub url: String,
        pub headers: Vec<(String, String)>,
        pub body: Value,
    }

    /// Records every call and answers from a queue, falling back to
    /// `default` when the queue is empty.
    pub struct MockTransport {
        pub calls: Mutex<Vec<Call>>,
        responses: Mutex<VecDeque<Result<Vec<u8>>>>,
        default: Vec<u8>,
    }

    impl MockTransport {
        pub fn answering(default: Value) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                responses: Mutex::new(VecDeque::new()),
                default: default.to_string().into_bytes(),
            }
        }

        pub fn push(&self, response: Result<Vec<u8>>) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Polls until `n` calls have been recorded, for fire-and-forget paths.
        pub async fn wait_for_calls(&self, n: usize) {
            for _ in 0..200 {
                if self.call_count() >= n {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!("expected {n} calls, saw {}", self.call_count());
        }
    }

    impl HttpTransport for MockTransport {
        async fn post_json(
            &self,
            url: &Url,
            headers: &[(&str, &str)],
            body: &Value,
        ) -> Result<Vec<u8>> {
            self.calls.lock().unwrap().push(Call {
                url: url.to_string(),
                headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                body: body.clone(),
            });
            let queued = self.responses.lock().unwrap().pop_front();
            queued.unwrap_or_else(|| Ok(self.default.clone()))
        }
    }
}
