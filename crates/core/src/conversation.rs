//! Conversation-related types.

use sales_agent_model::ModelMessage;

/// Who said a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The customer.
    User,
    /// The salesperson.
    Assistant,
}

/// One role-tagged message in the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Returns the speaker of this turn.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this turn.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    fn to_message(&self) -> ModelMessage {
        match self.role {
            Role::User => ModelMessage::User(self.content.clone()),
            Role::Assistant => ModelMessage::Assistant(self.content.clone()),
        }
    }
}

/// Represents a conversation.
///
/// Turns are only ever appended as a complete user/assistant exchange, so
/// the history always alternates and starts with the user.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Returns the turns, oldest first.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if nothing has been said yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the most recent assistant text, if any.
    pub fn last_assistant_message(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(Turn::content)
    }

    pub(crate) fn push_exchange(&mut self, user: String, assistant: String) {
        self.turns.reserve(2);
        self.turns.push(Turn {
            role: Role::User,
            content: user,
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            content: assistant,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn to_messages(&self) -> impl Iterator<Item = ModelMessage> {
        self.turns.iter().map(Turn::to_message)
    }
}
