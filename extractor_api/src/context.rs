use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use sys_locale::get_locale;
use thiserror::Error;
use tracing::debug;

use crate::transport::{HttpTransport, Method, Transport, TransportError};

/// Budget for every single transport call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum JsonRequestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct ExtractionContext {
    pub transport: Arc<dyn Transport>,
    pub locales: Vec<String>,
    pub timeout: Duration,
}

impl ExtractionContext {
    pub fn new() -> Result<ExtractionContext> {
        Self::new_with_locale(system_locales())
    }

    pub fn new_with_locale(locales: Vec<String>) -> Result<ExtractionContext> {
        Self::new_with_timeout(locales, DEFAULT_TIMEOUT)
    }

    pub fn new_with_timeout(locales: Vec<String>, timeout: Duration) -> Result<ExtractionContext> {
        let http = build_http(&locales, timeout)?;
        Ok(ExtractionContext {
            transport: Arc::new(HttpTransport::new(http, timeout)),
            locales,
            timeout,
        })
    }

    /// Context over any transport, mostly for tests and embedding.
    pub fn with_transport(transport: Arc<dyn Transport>) -> ExtractionContext {
        ExtractionContext {
            transport,
            locales: vec!["en-US".to_string()],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sends one request through the transport, cut off at [`ExtractionContext::timeout`]
    /// whatever the transport itself does.
    pub async fn request(
        &self,
        resource_name: &str,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<Vec<u8>, TransportError> {
        debug!(resource = resource_name, %method, url, "sending request");
        match tokio::time::timeout(
            self.timeout,
            self.transport.request(method, url, headers, body),
        )
        .await
        {
            Ok(response) => response,
            Err(_) => Err(TransportError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }),
        }
    }

    pub async fn get_json<A>(
        &self,
        resource_name: &str,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<A, JsonRequestError>
    where
        A: DeserializeOwned,
    {
        let response = self
            .request(resource_name, method, url, headers, body)
            .await?;
        serde_json::from_slice(&response).map_err(|source| JsonRequestError::Json {
            url: url.to_string(),
            source,
        })
    }
}

pub fn system_locales() -> Vec<String> {
    let locale = get_locale()
        .filter(|l| l != "c" && l != "C")
        .unwrap_or_else(|| "en-US".to_string());

    if locale.len() > 2 {
        vec![locale.clone(), locale[0..2].to_string()]
    } else {
        vec![locale]
    }
}

/// `Accept-Language` value, each following locale weighted 0.1 lower.
pub fn accept_language(locales: &[String]) -> String {
    locales
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if i != 0 {
                format!("{l};q={}", 1.0 - (i as f32 / 10.0))
            } else {
                l.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn build_http(locales: &[String], timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_str(&accept_language(locales))?,
    );
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .cookie_store(true)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?)
}
