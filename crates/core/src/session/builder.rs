use std::time::Duration;

use sales_agent_model::ModelProvider;

use super::Session;
use crate::conversation::Conversation;
use crate::inventory::Inventory;
use crate::model_client::ModelClient;
use crate::persona::Persona;

/// [`Session`] builder.
pub struct SessionBuilder {
    model_client: ModelClient,
    persona: Persona,
    inventory: Inventory,
}

impl SessionBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            persona: Persona::default(),
            inventory: Inventory::unavailable(),
        }
    }

    /// Sets the persona.
    #[inline]
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Sets the inventory the persona is grounded on.
    #[inline]
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    /// Bounds every model request with `timeout`.
    #[inline]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.model_client = self.model_client.with_timeout(timeout);
        self
    }

    /// Builds the session.
    #[inline]
    pub fn build(self) -> Session {
        Session {
            model_client: self.model_client,
            persona: self.persona,
            inventory: self.inventory,
            conversation: Conversation::default(),
        }
    }
}
