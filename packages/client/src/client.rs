//! Shared client hub: transport + observer + context.

use std::fmt;
use std::sync::Arc;

use crate::context::ClientContext;
use crate::observer::{NoopObserver, RequestObserver};
use crate::transport::HttpTransport;

/// Cheap-to-clone composition of the injected transport, the lifecycle
/// observer, and the process-scoped dispatch counters. Every builder
/// created from one `Client` shares all three.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn HttpTransport>,
    observer: Arc<dyn RequestObserver>,
    context: Arc<ClientContext>,
}

impl Client {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            observer: Arc::new(NoopObserver),
            context: Arc::new(ClientContext::new()),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Arc<ClientContext>) -> Self {
        self.context = context;
        self
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    pub fn observer(&self) -> &Arc<dyn RequestObserver> {
        &self.observer
    }

    pub fn context(&self) -> &Arc<ClientContext> {
        &self.context
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("dispatched", &self.context.dispatched())
            .field("in_flight", &self.context.in_flight())
            .finish_non_exhaustive()
    }
}
