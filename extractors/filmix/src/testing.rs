//! Scripted transport for exercising the extractor without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use vidtree_extractor_api::{async_trait, ExtractionContext, Method, Transport, TransportError};

use crate::config::default_filler_tokens;

#[derive(Clone, Debug)]
pub enum Reply {
    Body(Vec<u8>),
    Delayed(Duration, Vec<u8>),
    Fail,
    Hang,
}

impl Reply {
    pub fn json(value: serde_json::Value) -> Reply {
        Reply::Body(serde_json::to_vec(&value).unwrap())
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Answers by the first route whose prefix the requested URL starts with.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<(String, Reply)>,
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub cancelled: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, reply: Reply) -> Self {
        self.routes.push((prefix.to_string(), reply));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct CancelGuard<'a>(&'a AtomicUsize);

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body: body.map(str::to_string),
        });
        let reply = self
            .routes
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Fail);
        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Delayed(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Reply::Fail => Err(TransportError::Network {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
            Reply::Hang => {
                let _guard = CancelGuard(&self.cancelled);
                std::future::pending().await
            }
        }
    }
}

pub fn context(transport: &Arc<ScriptedTransport>) -> ExtractionContext {
    ExtractionContext::with_transport(transport.clone())
}

/// Obfuscates like the player does, with a couple of filler tokens thrown in.
pub fn obfuscate(plain: &str) -> String {
    let tokens = default_filler_tokens();
    let mut encoded = STANDARD.encode(plain);
    let middle = encoded.len() / 2;
    encoded.insert_str(middle, &tokens[3]);
    encoded.insert_str(4, &tokens[0]);
    encoded.insert_str(4, &tokens[2]);
    format!("#2{}", encoded.replace('/', "\\/"))
}
