//! The interactive conversation loop.

use std::io::{self, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use sales_agent_core::appointment::{
    AppointmentField, AppointmentForm, AppointmentStore,
};
use sales_agent_core::intent::IntentDetector;
use sales_agent_core::{Session, fallback_message};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const BANNER: &str = "\
Car Sales Assistant is ready!
You can ask about vehicle recommendations, specifications, pricing, and more.
Type 'exit' to end the conversation.";
const GOODBYE: &str = "Thank you for your time. Goodbye!";
const USER_PROMPT: &str = "You: ";

/// Reads customer lines from `input`, answers through the session, and runs
/// the appointment intake when a test-drive offer is accepted.
pub struct Repl<R, W> {
    input: R,
    output: W,
    session: Session,
    store: AppointmentStore,
    detector: IntentDetector,
    last_reply: Option<String>,
    styled: bool,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Creates a loop over the given input and output.
    pub fn new(
        input: R,
        output: W,
        session: Session,
        store: AppointmentStore,
    ) -> Self {
        Self {
            input,
            output,
            session,
            store,
            detector: IntentDetector::default(),
            last_reply: None,
            styled: false,
        }
    }

    /// Enables colored labels and the waiting spinner. Only meant for a
    /// real terminal.
    #[inline]
    pub fn with_styled_output(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Returns the session.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until the customer exits or the input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{BANNER}")?;

        loop {
            write!(self.output, "\n{USER_PROMPT}")?;
            self.output.flush()?;

            let Some(line) = self.read_line().await? else {
                writeln!(self.output)?;
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if is_exit_command(line) {
                writeln!(self.output, "\n{GOODBYE}")?;
                break;
            }

            let previous_reply = self.last_reply.take();
            let reply = match self.ask(line).await {
                Ok(reply) => {
                    self.last_reply = Some(reply.clone());
                    reply
                }
                Err(fallback) => {
                    self.last_reply = previous_reply.clone();
                    fallback
                }
            };
            self.print_reply(&reply)?;

            let accepted = previous_reply.is_some_and(|previous| {
                self.detector.detect_test_drive(&previous, line)
            });
            if accepted && !self.schedule_test_drive().await? {
                writeln!(self.output)?;
                break;
            }
        }

        debug!(
            "conversation ended after {} turns",
            self.session.history().len()
        );
        Ok(())
    }

    async fn ask(&mut self, line: &str) -> Result<String, String> {
        let spinner = self.styled.then(start_spinner);
        let result = self.session.try_submit(line).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        result.map_err(|err| fallback_message(&*err))
    }

    fn print_reply(&mut self, reply: &str) -> io::Result<()> {
        let name = self.session.persona().name();
        if self.styled {
            writeln!(self.output, "\n{}: {reply}", name.bright_cyan().bold())
        } else {
            writeln!(self.output, "\n{name}: {reply}")
        }
    }

    /// Returns `false` if the input ended before the form was complete.
    async fn schedule_test_drive(&mut self) -> io::Result<bool> {
        info!("test drive offer accepted, starting the intake");
        writeln!(self.output, "\nLet's schedule your test drive!")?;
        writeln!(self.output, "\nPlease provide the following information:")?;

        let Some(form) = self.collect_form().await? else {
            return Ok(false);
        };
        match self.store.save(form) {
            Ok(saved) => {
                writeln!(
                    self.output,
                    "Appointment saved: {}",
                    saved.path.display()
                )?;
                writeln!(
                    self.output,
                    "\nThank you! Your appointment has been scheduled."
                )?;
            }
            Err(err) => {
                let message = format!("Error saving appointment: {err}");
                if self.styled {
                    writeln!(self.output, "{}", message.bright_red())?;
                } else {
                    writeln!(self.output, "{message}")?;
                }
            }
        }
        Ok(true)
    }

    async fn collect_form(&mut self) -> io::Result<Option<AppointmentForm>> {
        let mut form = AppointmentStore::new_form();
        for field in AppointmentField::ALL {
            write!(self.output, "{}", field.prompt())?;
            self.output.flush()?;

            let Some(answer) = self.read_line().await? else {
                warn!("input ended during the appointment intake");
                return Ok(None);
            };
            form.set(field, answer);
        }
        Ok(Some(form))
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[inline]
fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

fn start_spinner() -> ProgressBar {
    let style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sales_agent_core::SessionBuilder;
    use sales_agent_model::ErrorKind;
    use sales_agent_test_model::TestModelProvider;

    use super::*;

    const OFFER: &str = "The Corolla is great. Want to test drive it?";

    struct Run {
        output: String,
        history_len: usize,
    }

    async fn run(
        model_provider: TestModelProvider,
        store: AppointmentStore,
        input: &str,
    ) -> Run {
        let session =
            SessionBuilder::with_model_provider(model_provider).build();
        let mut output = Vec::new();
        let history_len = {
            let mut repl =
                Repl::new(input.as_bytes(), &mut output, session, store);
            repl.run().await.unwrap();
            repl.session().history().len()
        };
        Run {
            output: String::from_utf8(output).unwrap(),
            history_len,
        }
    }

    #[tokio::test]
    async fn test_exit_commands() {
        for command in ["exit", "  QUIT  ", "Exit"] {
            let model_provider = TestModelProvider::default();
            let dir = tempfile::tempdir().unwrap();
            let input = format!("{command}\nHello\n");
            let run = run(
                model_provider.clone(),
                AppointmentStore::new(dir.path()),
                &input,
            )
            .await;

            assert!(run.output.contains("Car Sales Assistant is ready!"));
            assert!(run.output.ends_with(&format!("{GOODBYE}\n")));
            assert!(model_provider.requests().is_empty());
        }
    }

    #[tokio::test]
    async fn test_blank_lines_and_eof() {
        let model_provider = TestModelProvider::default();
        model_provider.add_reply("Hello! Looking for a car?");
        let dir = tempfile::tempdir().unwrap();

        let run = run(
            model_provider.clone(),
            AppointmentStore::new(dir.path()),
            "\n   \nHi\n",
        )
        .await;

        assert_eq!(model_provider.requests().len(), 1);
        assert_eq!(run.output.matches(USER_PROMPT).count(), 4);
        assert!(run.output.contains("\nHengyi: Hello! Looking for a car?\n"));
        assert!(!run.output.contains(GOODBYE));
        assert_eq!(run.history_len, 2);
    }

    #[tokio::test]
    async fn test_accepted_offer_records_appointment() {
        let model_provider = TestModelProvider::default();
        model_provider.add_reply(OFFER);
        model_provider.add_reply("Wonderful!");
        let dir = tempfile::tempdir().unwrap();
        let store_dir = dir.path().join("appointments");

        let input = "Any sedans?\nYes, sounds good\n\
            Ada\n555-0100\nSaturday 10am\nToyota Corolla\n\nexit\n";
        let run =
            run(model_provider, AppointmentStore::new(&store_dir), input).await;

        assert!(run.output.contains("Let's schedule your test drive!"));
        for field in AppointmentField::ALL {
            assert!(run.output.contains(field.prompt()));
        }
        assert!(run.output.contains("Appointment saved: "));
        assert!(
            run.output
                .contains("Thank you! Your appointment has been scheduled.")
        );

        let entries: Vec<_> = fs::read_dir(&store_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        let text = fs::read_to_string(&entries[0]).unwrap();
        assert!(text.contains("\"name\": \"Ada\""));
        assert!(text.contains("\"vehicle\": \"Toyota Corolla\""));
        assert!(text.contains("\"notes\": null"));
        assert!(text.contains("\"status\": \"pending\""));
    }

    #[tokio::test]
    async fn test_agreement_without_offer() {
        let model_provider = TestModelProvider::default();
        model_provider.add_reply("We have many sedans.");
        model_provider.add_reply("Great, which one?");
        let dir = tempfile::tempdir().unwrap();

        let run = run(
            model_provider,
            AppointmentStore::new(dir.path()),
            "Any sedans?\nSure\n",
        )
        .await;

        assert!(!run.output.contains("Let's schedule your test drive!"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_keeps_last_reply() {
        let model_provider = TestModelProvider::default();
        model_provider.add_reply(OFFER);
        model_provider.add_failure(ErrorKind::Network);
        model_provider.add_reply("Let's book it.");
        let dir = tempfile::tempdir().unwrap();

        let input = "Any sedans?\nhmm\nyes\n\
            Ada\n555-0100\nSunday\nCorolla\nnone\n";
        let run =
            run(model_provider, AppointmentStore::new(dir.path()), input)
                .await;

        assert!(run.output.contains("Hengyi: Sorry, an error occurred: "));
        assert!(run.output.contains("Let's schedule your test drive!"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(run.history_len, 4);
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_fatal() {
        let model_provider = TestModelProvider::default();
        model_provider.add_reply(OFFER);
        model_provider.add_reply("Great!");
        model_provider.add_reply("Anything else?");
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, b"occupied").unwrap();

        let input = "Any sedans?\nok\n\
            Ada\n555-0100\nSunday\nCorolla\n\nWhat about SUVs?\nquit\n";
        let run =
            run(model_provider, AppointmentStore::new(&blocker), input).await;

        assert!(run.output.contains("Error saving appointment: "));
        assert!(!run.output.contains("Appointment saved: "));
        assert!(run.output.contains("Hengyi: Anything else?"));
        assert!(run.output.ends_with(&format!("{GOODBYE}\n")));
    }

    #[tokio::test]
    async fn test_eof_during_intake() {
        let model_provider = TestModelProvider::default();
        model_provider.add_reply(OFFER);
        model_provider.add_reply("Great!");
        let dir = tempfile::tempdir().unwrap();

        let run = run(
            model_provider,
            AppointmentStore::new(dir.path()),
            "Any sedans?\nyes\nAda\n",
        )
        .await;

        assert!(run.output.contains(AppointmentField::Contact.prompt()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
