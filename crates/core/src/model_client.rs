use std::error::Error;
use std::fmt::{self, Display};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use sales_agent_model::{
    ErrorKind, ModelCompletion, ModelProvider, ModelProviderError,
    ModelRequest,
};
use tokio::time::timeout;
use tracing::Instrument;

/// The error returned by [`ModelClient`], whatever provider is behind it.
pub type ModelClientError = Box<dyn ModelProviderError>;

type SendRequestResult = Result<ModelCompletion, ModelClientError>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// The longest a single model request may take by default.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A wrapper around a model provider that bounds every request with a
/// timeout and provides a type-erased interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
    timeout: Duration,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    let completion = fut.await.map_err(|err| {
                        warn!("model request failed: {err}");
                        Box::new(err) as ModelClientError
                    })?;
                    trace!("finished a request");
                    Ok(completion)
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self {
            handler_fn,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the timeout for every request.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends a request and waits for the completion.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. Dropping the future drops the in-flight
    /// provider request.
    pub async fn send_request(&self, req: ModelRequest) -> SendRequestResult {
        match timeout(self.timeout, (self.handler_fn)(req)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("model request timed out after {:?}", self.timeout);
                Err(Box::new(Elapsed(self.timeout)))
            }
        }
    }
}

/// The error used when the provider did not answer in time.
#[derive(Debug)]
struct Elapsed(Duration);

impl Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no response from the model within {:?}", self.0)
    }
}

impl Error for Elapsed {}

impl ModelProviderError for Elapsed {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::Timeout
    }
}
