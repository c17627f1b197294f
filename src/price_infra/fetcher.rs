use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use crate::error::{Error, Result};

/// One upstream GET, as built by a provider or the chart service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
}

impl UpstreamRequest {
    pub fn new(url: impl Into<String>) -> Self {
        UpstreamRequest { url: url.into() }
    }
}

/// The only suspension point of price resolution.
///
/// Any transport error, timeout, non-2xx status or undecodable body is an
/// `Error::Upstream`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn get_json(&self, request: UpstreamRequest) -> Result<Value>;
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coinprice/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(ReqwestFetcher { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get_json(&self, request: UpstreamRequest) -> Result<Value> {
        let upstream = |e: reqwest::Error| Error::Upstream {
            url: request.url.clone(),
            reason: e.to_string(),
        };

        let response = self.client.get(&request.url)
            .send()
            .await
            .map_err(upstream)?
            .error_for_status()
            .map_err(upstream)?;

        response.json::<Value>().await.map_err(upstream)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Debug)]
    pub enum Scripted {
        Json(Value),
        Fail(&'static str),
    }

    /// Answers requests by the first registered URL fragment they contain
    /// and records every URL it was asked for.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        routes: Mutex<Vec<(String, Scripted)>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers or replaces the outcome for URLs containing `fragment`.
        pub fn respond(&self, fragment: &str, outcome: Scripted) {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(f, _)| f == fragment) {
                Some(route) => route.1 = outcome,
                None => routes.push((fragment.to_string(), outcome)),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn calls_to(&self, fragment: &str) -> usize {
            self.calls().iter().filter(|url| url.contains(fragment)).count()
        }

        pub fn reset_calls(&self) {
            self.calls.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl HttpFetcher for ScriptedFetcher {
        async fn get_json(&self, request: UpstreamRequest) -> Result<Value> {
            self.calls.lock().unwrap().push(request.url.clone());

            let outcome = self.routes.lock().unwrap()
                .iter()
                .find(|(fragment, _)| request.url.contains(fragment.as_str()))
                .map(|(_, outcome)| outcome.clone());

            match outcome {
                Some(Scripted::Json(body)) => Ok(body),
                Some(Scripted::Fail(reason)) => Err(Error::Upstream {
                    url: request.url,
                    reason: reason.to_string(),
                }),
                None => Err(Error::Upstream {
                    url: request.url,
                    reason: "connection refused".to_string(),
                }),
            }
        }
    }
}
