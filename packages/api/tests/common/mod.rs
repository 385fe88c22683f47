//! Shared test doubles: capturing, gated, and failing transports.

use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use http::StatusCode;
use tokio::sync::Semaphore;
use url::Url;

use courier::{
    Client, CompletionOption, Error, HttpRequest, HttpResponse, HttpTransport, PreparedBody,
    SendFuture,
};

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records every send and answers 200 with an empty JSON body.
#[derive(Default)]
pub struct CapturingTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
    pub completions: Mutex<Vec<CompletionOption>>,
    pub posts: Mutex<Vec<(Url, PreparedBody)>>,
}

impl CapturingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn client(self: &Arc<Self>) -> Client {
        Client::new(self.clone())
    }

    pub fn sent_urls(&self) -> Vec<Url> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url().clone())
            .collect()
    }
}

impl HttpTransport for CapturingTransport {
    fn send(&self, request: HttpRequest, completion: CompletionOption) -> SendFuture {
        self.requests.lock().unwrap().push(request);
        self.completions.lock().unwrap().push(completion);
        std::future::ready(Ok(HttpResponse::from_bytes(StatusCode::OK, &b"{}"[..]))).boxed()
    }

    fn send_post(&self, url: Url, body: PreparedBody) -> SendFuture {
        self.posts.lock().unwrap().push((url, body));
        std::future::ready(Ok(HttpResponse::from_bytes(StatusCode::OK, &b"{}"[..]))).boxed()
    }
}

/// Holds every send until a permit is released.
pub struct GatedTransport {
    pub gate: Arc<Semaphore>,
}

impl GatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Arc::new(Semaphore::new(0)),
        })
    }

    pub fn client(self: &Arc<Self>) -> Client {
        Client::new(self.clone())
    }

    pub fn release(&self, permits: usize) {
        self.gate.add_permits(permits);
    }
}

impl HttpTransport for GatedTransport {
    fn send(&self, _request: HttpRequest, _completion: CompletionOption) -> SendFuture {
        let gate = self.gate.clone();
        async move {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| Error::request("gate closed").with(e))?;
            Ok(HttpResponse::from_bytes(StatusCode::OK, &b""[..]))
        }
        .boxed()
    }

    fn send_post(&self, _url: Url, _body: PreparedBody) -> SendFuture {
        let gate = self.gate.clone();
        async move {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| Error::request("gate closed").with(e))?;
            Ok(HttpResponse::from_bytes(StatusCode::OK, &b""[..]))
        }
        .boxed()
    }
}

/// Fails every send with a fixed transport error.
pub struct FailingTransport;

impl HttpTransport for FailingTransport {
    fn send(&self, _request: HttpRequest, _completion: CompletionOption) -> SendFuture {
        std::future::ready(Err(Error::request("connection refused"))).boxed()
    }

    fn send_post(&self, _url: Url, _body: PreparedBody) -> SendFuture {
        std::future::ready(Err(Error::request("connection refused"))).boxed()
    }
}
