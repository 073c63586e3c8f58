use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use sales_agent_model::{
    ErrorKind, ModelCompletion, ModelFinishReason, ModelMessage,
    ModelProvider, ModelProviderError, ModelRequest,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message after a short pause.
struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelCompletion, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        async move {
            sleep(Duration::from_millis(1)).await;
            let Some(text) = last_user else {
                return Err(FakeModelProviderError(ErrorKind::Other));
            };
            Ok(ModelCompletion::stop(format!("You said {text}")))
        }
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeModelProvider;
        let req = ModelRequest {
            messages: vec![
                ModelMessage::System("Be brief.".to_string()),
                ModelMessage::User("Good morning".to_string()),
            ],
        };
        assert_eq!(req.system_instruction(), Some("Be brief."));

        let completion = provider.send_request(&req).await.unwrap();
        assert_eq!(completion.content, "You said Good morning");
        assert_eq!(completion.finish_reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeModelProvider;
        let req = ModelRequest::default();
        assert_eq!(req.system_instruction(), None);

        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.to_string(), "Model error");
    }
}
