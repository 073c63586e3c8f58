//! The customer conversation and how it reaches the model.

mod builder;
#[cfg(test)]
mod tests;

use sales_agent_model::{
    ModelFinishReason, ModelMessage, ModelProviderError, ModelRequest,
};

pub use builder::SessionBuilder;

use crate::conversation::Conversation;
use crate::inventory::Inventory;
use crate::model_client::{ModelClient, ModelClientError};
use crate::persona::Persona;

/// One customer conversation with the salesperson.
///
/// The session owns the history and the inventory it grounds the persona
/// on. It sends exactly one model request per submitted message, and only
/// a successful exchange changes the history.
pub struct Session {
    model_client: ModelClient,
    persona: Persona,
    inventory: Inventory,
    conversation: Conversation,
}

impl Session {
    /// Returns the persona the model plays.
    #[inline]
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Returns the inventory used for grounding.
    #[inline]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Replaces the inventory. The next submitted message already uses it.
    #[inline]
    pub fn set_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    /// Returns the turns exchanged so far.
    #[inline]
    pub fn history(&self) -> &Conversation {
        &self.conversation
    }

    /// Builds the system instruction for the current inventory.
    #[inline]
    pub fn system_prompt(&self) -> String {
        self.persona.render(&self.inventory)
    }

    /// Sends a user message and returns the assistant reply.
    ///
    /// On failure the history is left exactly as it was, and the error is
    /// returned to the caller.
    pub async fn try_submit(
        &mut self,
        user_message: &str,
    ) -> Result<String, ModelClientError> {
        let request = self.build_model_request(user_message);
        debug!(
            "submitting a message with {} history turns",
            self.conversation.len()
        );

        let completion = self.model_client.send_request(request).await?;
        if completion.finish_reason == Some(ModelFinishReason::Length) {
            debug!("the reply was cut at the output token limit");
        }

        self.conversation
            .push_exchange(user_message.to_owned(), completion.content.clone());
        Ok(completion.content)
    }

    /// Sends a user message and returns the assistant reply, or a visible
    /// apology naming the failure.
    ///
    /// This never fails. A failed exchange leaves the history untouched.
    pub async fn submit(&mut self, user_message: &str) -> String {
        match self.try_submit(user_message).await {
            Ok(reply) => reply,
            Err(err) => fallback_message(&*err),
        }
    }

    /// Forgets every turn. The next message starts a brand-new conversation.
    #[inline]
    pub fn reset(&mut self) {
        self.conversation.clear();
    }

    fn build_model_request(&self, user_message: &str) -> ModelRequest {
        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(ModelMessage::System(self.system_prompt()));
        messages.extend(self.conversation.to_messages());
        messages.push(ModelMessage::User(user_message.to_owned()));
        ModelRequest { messages }
    }
}

/// The text shown to the customer when the model could not answer.
pub fn fallback_message(err: &dyn ModelProviderError) -> String {
    format!("Sorry, an error occurred: {err}")
}
