//! Dispatch lifecycle: notification order, send transformation, counters,
//! cancellation, and failure wrapping.

mod common;

use std::any::Any;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use courier::{
    CancellationToken, Client, Courier, Error, HttpRequest, HttpResponse, RequestHandler,
    RequestInfo, RequestObserver, SendTask,
};

use common::{CapturingTransport, FailingTransport, GatedTransport};

#[derive(Default)]
struct LifecycleObserver {
    events: Arc<Mutex<Vec<String>>>,
}

impl LifecycleObserver {
    fn push(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

impl RequestObserver for LifecycleObserver {
    fn on_request_created(&self, _request: &HttpRequest) {
        self.push("created");
    }

    fn transform_send_task(&self, send: SendTask) -> BoxFuture<'static, courier::Result<HttpResponse>> {
        self.push("transform");
        send()
    }

    fn on_request_started(&self, handler: &RequestHandler<HttpResponse>) {
        self.push(&format!("started #{}", handler.request().id));
    }

    fn on_request_finished(&self, request: &RequestInfo) {
        self.push(&format!("finished #{}", request.id));
    }

    fn on_before_continue(&self, _request: &RequestInfo, _value: &dyn Any) {
        self.push("before_continue");
    }
}

#[tokio::test]
async fn lifecycle_notifications_fire_in_order() {
    common::init_logging();
    let events = Arc::new(Mutex::new(Vec::new()));
    let observer = Arc::new(LifecycleObserver {
        events: events.clone(),
    });
    let transport = CapturingTransport::new();
    let client = transport.client().with_observer(observer);

    let hook_events = events.clone();
    let post_events = events.clone();
    let outcome = Courier::request(&client)
        .url("https://api.example.com/")
        .before_dispatch(move |_request| {
            hook_events.lock().unwrap().push("pre_hook".to_string());
        })
        .after_dispatch(move |_info| {
            post_events.lock().unwrap().push("post_hook".to_string());
        })
        .dispatch(CancellationToken::new())
        .await;
    assert!(outcome.is_success());

    // the settlement task runs concurrently, so only the synchronous
    // events have a fixed order; finished is guaranteed by the time the
    // outcome is delivered
    let events = events.lock().unwrap().clone();
    let sync_events: Vec<_> = events
        .iter()
        .filter(|event| !event.starts_with("finished"))
        .cloned()
        .collect();
    assert_eq!(
        sync_events,
        vec!["created", "pre_hook", "transform", "started #1", "post_hook"]
    );
    assert!(events.contains(&"finished #1".to_string()));
}

#[tokio::test]
async fn pre_dispatch_hooks_can_stamp_headers() {
    let transport = CapturingTransport::new();
    let outcome = Courier::request(&transport.client())
        .url("https://api.example.com/")
        .before_dispatch(|request| {
            request
                .headers_mut()
                .insert("x-stamped", http::HeaderValue::from_static("late"));
        })
        .dispatch(CancellationToken::new())
        .await;
    assert!(outcome.is_success());

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests[0].headers()["x-stamped"], "late");
}

#[tokio::test]
async fn request_ids_are_sequential_per_client() {
    let transport = CapturingTransport::new();
    let client = transport.client();

    let first = Courier::request(&client)
        .url("https://api.example.com/a")
        .dispatch(CancellationToken::new());
    let second = Courier::request(&client)
        .url("https://api.example.com/b")
        .dispatch(CancellationToken::new());

    assert_eq!(first.request().id, 1);
    assert_eq!(second.request().id, 2);
    assert!(first.await.is_success());
    assert!(second.await.is_success());
    assert_eq!(client.context().dispatched(), 2);
}

#[tokio::test]
async fn in_flight_counter_tracks_concurrent_dispatches() {
    let transport = GatedTransport::new();
    let client = transport.client();

    let handlers: Vec<_> = (0..3)
        .map(|i| {
            Courier::request(&client)
                .url(&format!("https://api.example.com/{i}"))
                .dispatch(CancellationToken::new())
        })
        .collect();
    assert_eq!(client.context().in_flight(), 3);

    transport.release(3);
    for handler in handlers {
        assert!(handler.await.is_success());
    }
    assert_eq!(client.context().in_flight(), 0);
}

#[tokio::test]
async fn completion_option_is_forwarded_to_the_transport() {
    let transport = CapturingTransport::new();
    let outcome = Courier::request(&transport.client())
        .url("https://api.example.com/stream")
        .dispatch_with(
            CancellationToken::new(),
            courier::CompletionOption::HeadersReceived,
        )
        .await;
    assert!(outcome.is_success());
    assert_eq!(
        *transport.completions.lock().unwrap(),
        vec![courier::CompletionOption::HeadersReceived]
    );
}

struct WrappingObserver {
    wrapped: Arc<Mutex<bool>>,
}

impl RequestObserver for WrappingObserver {
    fn transform_send_task(&self, send: SendTask) -> BoxFuture<'static, courier::Result<HttpResponse>> {
        let wrapped = self.wrapped.clone();
        async move {
            *wrapped.lock().unwrap() = true;
            send().await
        }
        .boxed()
    }
}

#[tokio::test]
async fn transform_send_task_wraps_the_send() {
    let wrapped = Arc::new(Mutex::new(false));
    let transport = CapturingTransport::new();
    let client = transport.client().with_observer(Arc::new(WrappingObserver {
        wrapped: wrapped.clone(),
    }));

    let outcome = Courier::request(&client)
        .url("https://api.example.com/")
        .dispatch(CancellationToken::new())
        .await;
    assert!(outcome.is_success());
    assert!(*wrapped.lock().unwrap());
    assert_eq!(transport.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn cancellation_resolves_cancelled_and_still_finishes() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let observer = Arc::new(LifecycleObserver {
        events: events.clone(),
    });
    // gate never released; cancellation is the only way out
    let transport = GatedTransport::new();
    let client = transport.client().with_observer(observer);

    let token = CancellationToken::new();
    let handler = Courier::request(&client)
        .url("https://api.example.com/slow")
        .dispatch(token.clone());
    assert_eq!(client.context().in_flight(), 1);

    token.cancel();
    let outcome = handler.await;
    assert!(outcome.is_canceled());
    assert_eq!(client.context().in_flight(), 0);
    assert!(events
        .lock()
        .unwrap()
        .contains(&"finished #1".to_string()));
}

struct MessageObserver;

impl RequestObserver for MessageObserver {
    fn build_error_message(
        &self,
        request: &RequestInfo,
        _response: Option<&HttpResponse>,
        error: Option<&Error>,
    ) -> String {
        format!(
            "{} {} went sideways: {}",
            request.method,
            request.url,
            error.map_or_else(|| "unknown".to_string(), ToString::to_string)
        )
    }
}

#[tokio::test]
async fn transport_failures_are_wrapped_with_the_observer_message() {
    let client = Client::new(Arc::new(FailingTransport)).with_observer(Arc::new(MessageObserver));

    let error = Courier::request(&client)
        .url("https://api.example.com/down")
        .dispatch(CancellationToken::new())
        .await
        .failure()
        .expect("transport failure must surface");

    assert_eq!(
        error.to_string(),
        "GET https://api.example.com/down went sideways: connection refused"
    );
    // the original error stays reachable for inspection
    let source = error.source().expect("original error attached");
    assert_eq!(source.to_string(), "connection refused");
    assert_eq!(client.context().in_flight(), 0);
}

#[tokio::test]
async fn unawaited_handlers_still_settle_the_counter() {
    let transport = CapturingTransport::new();
    let client = transport.client();

    let handler = Courier::request(&client)
        .url("https://api.example.com/fire-and-forget")
        .dispatch(CancellationToken::new());
    drop(handler);

    // the detached settlement runs even though nobody awaits the chain
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(client.context().in_flight(), 0);
    assert_eq!(transport.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn deferred_body_errors_surface_at_dispatch() {
    let transport = CapturingTransport::new();
    let client = transport.client();
    let error = Courier::request(&client)
        .url("https://api.example.com/upload")
        .method(http::Method::POST)
        .text_body("hello")
        .form_part("file", "a.txt", &b"one"[..])
        .dispatch(CancellationToken::new())
        .await
        .failure()
        .expect("appending a form part onto a text body must fail");

    assert!(error.is_builder());
    assert!(transport.posts.lock().unwrap().is_empty());
    assert_eq!(client.context().in_flight(), 0);
}

#[tokio::test]
async fn chained_processing_works_end_to_end() {
    let transport = CapturingTransport::new();
    let value = Courier::json(&transport.client())
        .url("https://api.example.com/objects")
        .dispatch(CancellationToken::new())
        .ensure_success()
        .as_json::<serde_json::Value>()
        .await
        .success()
        .expect("empty JSON object parses");
    assert_eq!(value, serde_json::json!({}));
}
