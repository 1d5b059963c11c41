#![cfg(test)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::classify::RawResponse;
use crate::transport::Transport;
use crate::Request;

/// Start a mock server answering every request with `status` and `body`
pub(crate) async fn mock_server_with_body(status: u16, body: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&mock_server)
        .await;
    mock_server
}

/// A [`Transport`] that replays a fixed list of responses and records
/// every request it was asked to send.
///
/// Once the script runs out, the last response is repeated.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<RawResponse>>,
    last: Mutex<Option<RawResponse>>,
    sent: Mutex<Vec<(Instant, Request)>>,
}

impl ScriptedTransport {
    pub(crate) fn new<I: IntoIterator<Item = RawResponse>>(script: I) -> Self {
        ScriptedTransport {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Script made of plain bodies
    pub(crate) fn bodies(bodies: &[&str]) -> Self {
        Self::new(bodies.iter().map(|b| RawResponse::from_body(b.to_string())))
    }

    pub(crate) fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(crate) fn sent_at(&self) -> Vec<Instant> {
        self.sent.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &Request) -> RawResponse {
        self.sent
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(raw) => {
                *last = Some(raw.clone());
                raw
            }
            None => last
                .clone()
                .unwrap_or_else(|| RawResponse::Failed("script exhausted".to_string())),
        }
    }
}
