//! Talk to the car sales assistant in the terminal.

#[macro_use]
extern crate tracing;

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser as _;
use sales_agent::core::SessionBuilder;
use sales_agent::core::appointment::AppointmentStore;
use sales_agent::core::inventory::Inventory;
use sales_agent::{Cli, Repl, Settings};
use sales_agent_openai_model::OpenAIProvider;
use tokio::io::{self, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env(Cli::parse()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let inventory = Inventory::load_or_unavailable(&settings.inventory_path);
    let session = SessionBuilder::with_model_provider(OpenAIProvider::new(
        settings.openai,
    ))
    .with_persona(settings.persona)
    .with_inventory(inventory)
    .with_request_timeout(settings.request_timeout)
    .build();
    let store = AppointmentStore::new(settings.appointments_dir);

    let stdout = std::io::stdout();
    let styled = stdout.is_terminal();
    let mut repl =
        Repl::new(BufReader::new(io::stdin()), stdout.lock(), session, store)
            .with_styled_output(styled);

    if let Err(err) = repl.run().await {
        error!("error reading input: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
