use std::time::Duration;

use sales_agent_model::{ErrorKind, ModelMessage};
use sales_agent_test_model::TestModelProvider;

use crate::conversation::Role;
use crate::inventory::{Inventory, NO_INVENTORY};
use crate::persona::{Persona, PersonaStyle};
use crate::SessionBuilder;

fn inventory() -> Inventory {
    Inventory::from_reader(
        &b"make,model,price\nToyota,Corolla,22000\nHonda,Civic,25000\n"[..],
    )
    .unwrap()
}

#[tokio::test]
async fn test_history_alternates() {
    let model_provider = TestModelProvider::default();
    let replies = ["Hi there!", "The Corolla is $22k.", "Come by Saturday."];
    for reply in replies {
        model_provider.add_reply(reply);
    }

    let mut session = SessionBuilder::with_model_provider(model_provider)
        .with_inventory(inventory())
        .build();
    let inputs = ["Hello", "Something cheap?", "When can I see it?"];
    for (n, input) in inputs.into_iter().enumerate() {
        let reply = session.submit(input).await;
        assert_eq!(reply, replies[n]);
        assert_eq!(session.history().len(), 2 * (n + 1));
    }

    for (idx, turn) in session.history().turns().iter().enumerate() {
        let expected_role = if idx % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        };
        assert_eq!(turn.role(), expected_role);
    }
    assert_eq!(session.history().turns()[2].content(), "Something cheap?");
    assert_eq!(
        session.history().last_assistant_message(),
        Some("Come by Saturday.")
    );
}

#[tokio::test]
async fn test_request_order() {
    let model_provider = TestModelProvider::default();
    model_provider.add_reply("Hi there!");
    model_provider.add_reply("The Civic is $25k.");

    let mut session =
        SessionBuilder::with_model_provider(model_provider.clone())
            .with_persona(Persona::new("Hennyi", PersonaStyle::Deliberative))
            .with_inventory(inventory())
            .build();
    session.submit("Hello").await;
    session.submit("And Honda?").await;

    let requests = model_provider.requests();
    assert_eq!(requests.len(), 2);

    let system_prompt = session.system_prompt();
    assert!(system_prompt.starts_with("You are Hennyi"));
    assert_eq!(
        requests[1].messages,
        [
            ModelMessage::System(system_prompt),
            ModelMessage::User("Hello".to_owned()),
            ModelMessage::Assistant("Hi there!".to_owned()),
            ModelMessage::User("And Honda?".to_owned()),
        ]
    );

    // The system instruction is never stored as a turn.
    assert!(
        session
            .history()
            .turns()
            .iter()
            .all(|turn| !turn.content().starts_with("You are Hennyi"))
    );
}

#[tokio::test]
async fn test_failure_keeps_history() {
    let model_provider = TestModelProvider::default();
    model_provider.add_reply("Hi there!");
    model_provider.add_failure(ErrorKind::Authentication);
    model_provider.add_reply("Still here.");

    let mut session =
        SessionBuilder::with_model_provider(model_provider.clone()).build();
    session.submit("Hello").await;
    let before = session.history().clone();

    let reply = session.submit("Anything electric?").await;
    assert!(reply.starts_with("Sorry, an error occurred: "));
    assert!(reply.contains("Authentication failed"));
    assert_eq!(session.history(), &before);

    // The next turn continues from the untouched history.
    let reply = session.submit("Anything electric?").await;
    assert_eq!(reply, "Still here.");
    assert_eq!(session.history().len(), 4);
    assert_eq!(model_provider.requests()[2].messages.len(), 4);
}

#[tokio::test]
async fn test_try_submit_surfaces_error() {
    let model_provider = TestModelProvider::default();
    model_provider.add_failure(ErrorKind::MalformedResponse);

    let mut session =
        SessionBuilder::with_model_provider(model_provider).build();
    let err = session.try_submit("Hello").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(session.history().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_keeps_history() {
    let mut model_provider = TestModelProvider::default();
    model_provider.set_delay(Duration::from_secs(30));
    model_provider.add_reply("Too late");

    let mut session = SessionBuilder::with_model_provider(model_provider)
        .with_request_timeout(Duration::from_secs(5))
        .build();
    let err = session.try_submit("Hello").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_reset() {
    let model_provider = TestModelProvider::default();
    model_provider.add_reply("Hi there!");
    model_provider.add_reply("Welcome back!");

    let mut session =
        SessionBuilder::with_model_provider(model_provider.clone()).build();
    session.reset();
    assert!(session.history().is_empty());

    session.submit("Hello").await;
    session.reset();
    assert!(session.history().is_empty());

    session.submit("Hello again").await;
    let requests = model_provider.requests();
    assert_eq!(requests[1].messages.len(), 2);
    assert_eq!(
        requests[1].messages[1],
        ModelMessage::User("Hello again".to_owned())
    );
}

#[tokio::test]
async fn test_prompt_follows_inventory() {
    let model_provider = TestModelProvider::default();
    model_provider.add_reply("We have no listings right now.");
    model_provider.add_reply("The Corolla is $22k.");

    let mut session =
        SessionBuilder::with_model_provider(model_provider.clone()).build();
    assert!(!session.inventory().is_available());
    assert!(session.system_prompt().ends_with(NO_INVENTORY));
    session.submit("What do you have?").await;

    session.set_inventory(inventory());
    assert_eq!(session.inventory().len(), 2);
    session.submit("And now?").await;

    let requests = model_provider.requests();
    let prompt = requests[0].system_instruction().unwrap();
    assert!(prompt.ends_with(NO_INVENTORY));
    let prompt = requests[1].system_instruction().unwrap();
    assert!(prompt.ends_with(&inventory().render()));
    assert!(prompt.contains("Toyota  Corolla  22000"));
}
