use serde::{Deserialize, Serialize};

/// The reason why a model completion has finished.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelFinishReason {
    /// The model has finished generating text.
    Stop,
    /// The model hit the output token limit.
    Length,
}

/// A completely received answer from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelCompletion {
    /// The assistant text.
    pub content: String,
    /// The reason the model finished generating, if the provider told us.
    pub finish_reason: Option<ModelFinishReason>,
}

impl ModelCompletion {
    /// Creates a completion that finished normally.
    #[inline]
    pub fn stop<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(ModelFinishReason::Stop),
        }
    }
}
