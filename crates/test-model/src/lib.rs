//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use sales_agent_model::{
    ErrorKind, ModelCompletion, ModelProvider, ModelProviderError,
    ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should answer each request. Every request consumes the next
/// preset response in order, and is recorded so tests can inspect exactly
/// what was sent. If the script runs out, an error is returned.
///
/// Clones share the same script, so a test can keep a clone around after
/// handing the provider to a session.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Appends a successful reply to the script.
    #[inline]
    pub fn add_reply<S: Into<String>>(&self, text: S) {
        self.add_response(PresetResponse::reply(text));
    }

    /// Appends a failure to the script.
    #[inline]
    pub fn add_failure(&self, kind: ErrorKind) {
        self.add_response(PresetResponse::failure(kind));
    }

    /// Appends a preset response to the script.
    #[inline]
    pub fn add_response(&self, response: PresetResponse) {
        self.lock().responses.push_back(response);
    }

    /// Delays every response by `duration`.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of preset responses not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lock().responses.len()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A test that panicked while holding the lock has already failed.
        self.script.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelCompletion, Self::Error>> + Send + 'static
    {
        let response = {
            let mut script = self.lock();
            script.requests.push(req.clone());
            script.responses.pop_front()
        };
        let delay = self.delay;

        async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            match response {
                Some(PresetResponse::Reply(text)) => {
                    Ok(ModelCompletion::stop(text))
                }
                Some(PresetResponse::Failure(kind)) => Err(Error {
                    message: "scripted failure",
                    kind,
                }),
                None => Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sales_agent_model::ModelMessage;

    use super::*;

    fn user_request(text: &str) -> ModelRequest {
        ModelRequest {
            messages: vec![ModelMessage::User(text.to_owned())],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let provider = TestModelProvider::default();
        provider.add_reply("Hello, world!");
        provider.add_failure(ErrorKind::Authentication);

        let completion =
            provider.send_request(&user_request("Hi")).await.unwrap();
        assert_eq!(completion.content, "Hello, world!");

        let err = provider
            .send_request(&user_request("Again"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);

        let err = provider
            .send_request(&user_request("Once more"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);

        let requests = provider.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1], user_request("Again"));
        assert_eq!(provider.remaining(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_script() {
        let provider = TestModelProvider::default();
        let observer = provider.clone();
        provider.add_reply("Sure.");

        observer.send_request(&user_request("Hi")).await.unwrap();
        assert_eq!(provider.requests().len(), 1);
        assert_eq!(provider.remaining(), 0);
    }
}
