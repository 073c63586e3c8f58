/// A request to be sent to the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The input messages, in the order the model should read them.
    pub messages: Vec<ModelMessage>,
}

impl ModelRequest {
    /// Returns the system instruction if the request starts with one.
    #[inline]
    pub fn system_instruction(&self) -> Option<&str> {
        match self.messages.first() {
            Some(ModelMessage::System(text)) => Some(text),
            _ => None,
        }
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
}
