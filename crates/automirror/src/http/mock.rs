//! In-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

type Route = (HttpMethod, String);

#[derive(Default)]
struct Router {
    queued: HashMap<Route, VecDeque<HttpResponse>>,
    sent: Vec<HttpRequest>,
}

/// Answers each (method, URL) with the responses queued for it, oldest
/// first, and keeps every request it saw. Clones share the same state.
#[derive(Clone, Default)]
pub struct MockTransport {
    router: Arc<Mutex<Router>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn router(&self) -> MutexGuard<'_, Router> {
        self.router.lock().expect("mock router poisoned")
    }

    pub fn push_response(&self, method: HttpMethod, url: impl Into<String>, response: HttpResponse) {
        self.router()
            .queued
            .entry((method, url.into()))
            .or_default()
            .push_back(response);
    }

    pub fn push_json(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        body: serde_json::Value,
    ) {
        let body = serde_json::to_vec(&body).expect("serializable body");
        self.push_response(method, url, HttpResponse { status, body });
    }

    pub fn push_status(&self, method: HttpMethod, url: impl Into<String>, status: u16) {
        self.push_response(
            method,
            url,
            HttpResponse {
                status,
                body: Vec::new(),
            },
        );
    }

    /// Every request sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.router().sent.clone()
    }

    /// Requests sent to one route, oldest first.
    pub fn requests_to(&self, method: HttpMethod, url: &str) -> Vec<HttpRequest> {
        self.router()
            .sent
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut router = self.router();
        let route = (request.method, request.url.clone());
        router.sent.push(request);

        router
            .queued
            .get_mut(&route)
            .and_then(VecDeque::pop_front)
            .ok_or(HttpError::Unrouted {
                method: route.0,
                url: route.1,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_responses_are_consumed_per_route() {
        let transport = MockTransport::new();
        transport.push_status(HttpMethod::Get, "https://a/x", 404);
        transport.push_status(HttpMethod::Get, "https://a/x", 200);
        transport.push_status(HttpMethod::Post, "https://a/x", 201);

        let send = |method| transport.send(HttpRequest::new(method, "https://a/x"));
        assert_eq!(send(HttpMethod::Post).await.expect("post").status, 201);
        assert_eq!(send(HttpMethod::Get).await.expect("first get").status, 404);
        assert_eq!(send(HttpMethod::Get).await.expect("second get").status, 200);

        assert_eq!(transport.requests().len(), 3);
        assert_eq!(transport.requests_to(HttpMethod::Get, "https://a/x").len(), 2);
    }

    #[tokio::test]
    async fn exhausted_route_is_an_error_but_still_recorded() {
        let transport = MockTransport::new();
        let err = transport
            .send(HttpRequest::new(HttpMethod::Patch, "https://a/gone"))
            .await
            .expect_err("nothing queued");

        assert!(matches!(
            err,
            HttpError::Unrouted { method: HttpMethod::Patch, ref url } if url == "https://a/gone"
        ));
        assert_eq!(transport.requests().len(), 1);
    }
}
