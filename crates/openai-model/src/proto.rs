use sales_agent_model::{
    ErrorKind, ModelCompletion, ModelFinishReason, ModelMessage,
    ModelRequest,
};
use serde::{Deserialize, Serialize};

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub id: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: req.messages.iter().map(create_message).collect(),
    }
}

#[inline]
fn create_message(msg: &ModelMessage) -> Message {
    match msg {
        ModelMessage::System(content) => Message::System {
            content: content.clone(),
        },
        ModelMessage::User(content) => Message::User {
            content: content.clone(),
        },
        ModelMessage::Assistant(content) => Message::Assistant {
            content: content.clone(),
        },
    }
}

/// Turns a successful response body into a completion.
pub fn parse_completion(body: &str) -> Result<ModelCompletion, Error> {
    let completion = serde_json::from_str::<ChatCompletion>(body).map_err(
        |err| Error::new(format!("{err}"), ErrorKind::MalformedResponse),
    )?;
    trace!("got completion: {:?}", completion.id);

    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new(
            "response has no choices",
            ErrorKind::MalformedResponse,
        ));
    };

    let finish_reason = match choice.finish_reason.as_deref() {
        Some("content_filter") => {
            return Err(Error::new(
                "response was withheld by the content filter",
                ErrorKind::Moderated,
            ));
        }
        Some("stop") => Some(ModelFinishReason::Stop),
        Some("length") => Some(ModelFinishReason::Length),
        _ => None,
    };

    let Some(content) = choice.message.content else {
        return Err(Error::new(
            "response message has no content",
            ErrorKind::MalformedResponse,
        ));
    };

    Ok(ModelCompletion {
        content,
        finish_reason,
    })
}

/// Extracts the human readable message from an error body, if any.
pub fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|body| body.error.message)
}
