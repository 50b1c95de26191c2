use super::Diagnostics;
use crate::domain::order::RequestId;
use crate::domain::ports::BackendBox;
use crate::domain::session::Session;
use crate::error::{Result, StoreError};
use crate::interfaces::console::{Console, MAX_INPUT_ATTEMPTS};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminChoice {
    ListRequests,
    Fulfill,
    Revenue,
    Quit,
}

fn parse_choice(line: &str) -> Option<AdminChoice> {
    match line {
        "a" => Some(AdminChoice::ListRequests),
        "b" => Some(AdminChoice::Fulfill),
        "c" => Some(AdminChoice::Revenue),
        "q" => Some(AdminChoice::Quit),
        _ => None,
    }
}

/// The employee-facing session loop: list unfulfilled requests, fulfill one,
/// or show total revenue.
pub struct AdminApp<R, W> {
    console: Console<R, W>,
    backend: BackendBox,
    session: Session,
    diagnostics: Diagnostics,
}

impl<R: BufRead, W: Write> AdminApp<R, W> {
    pub fn new(
        console: Console<R, W>,
        backend: BackendBox,
        session: Session,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            console,
            backend,
            session,
            diagnostics,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.console.divider()?;
        self.console
            .say("HELLO AND WELCOME TO BRICKSHOP ADMINISTRATION! :)")?;
        tracing::info!(username = self.session.username(), "admin session started");

        loop {
            self.console.divider()?;
            self.console.say("What best describes you?\n")?;
            self.console
                .say("  [a] - I want to see all unfulfilled requests.")?;
            self.console
                .say("  [b] - I want to fulfill a request for a customer.")?;
            self.console
                .say("  [c] - I want to see the total revenue of this store.")?;
            self.console.say("  [q] - Exit this app.")?;
            self.console.say("")?;

            let Some(answer) = self.console.ask_lowercase("Enter an option: ")? else {
                break;
            };
            // Unrecognized input falls through to the next menu pass.
            let Some(choice) = parse_choice(&answer) else {
                continue;
            };
            if choice == AdminChoice::Quit {
                break;
            }

            let outcome = self.dispatch(choice).await;
            self.report(outcome)?;
        }

        self.console.divider()?;
        self.console.say("Thanks for managing the Brickshop!")?;
        self.console.divider()?;
        Ok(())
    }

    async fn dispatch(&mut self, choice: AdminChoice) -> Result<()> {
        match choice {
            AdminChoice::ListRequests => self.list_requests().await,
            AdminChoice::Fulfill => self.fulfill_request().await,
            AdminChoice::Revenue => self.show_revenue().await,
            AdminChoice::Quit => Ok(()),
        }
    }

    /// One generic line in operator mode; verbose mode propagates the raw
    /// diagnostic out of the process.
    fn report(&mut self, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(StoreError::Cancelled) => self
                .console
                .say("\nNo usable input received; returning to the menu."),
            Err(err) if self.diagnostics.verbose() => Err(err),
            Err(err) => {
                tracing::error!(error = %err, "handler failed");
                self.console
                    .say("\nAn error occurred! Please contact technical support.")
            }
        }
    }

    async fn list_requests(&mut self) -> Result<()> {
        self.console.divider()?;
        self.console.say(
            "Here is a list of unfulfilled request IDs and the products they are requesting:",
        )?;
        for row in self.backend.pending_requests().await? {
            self.console.say(&format!(
                "\nRequest #{} requesting product #{}.",
                row.request, row.product
            ))?;
        }
        Ok(())
    }

    async fn fulfill_request(&mut self) -> Result<()> {
        let mut prompt = "\nWhat is the ID of the request you're fulfilling? ";
        for _ in 0..MAX_INPUT_ATTEMPTS {
            let Some(line) = self.console.ask(prompt)? else {
                return Err(StoreError::Cancelled);
            };

            // Re-fetched on every attempt so the check reflects current state.
            let pending = self.backend.pending_requests().await?;
            if let Ok(request) = line.parse::<RequestId>()
                && pending.iter().any(|row| row.request == request)
            {
                match self.backend.fulfill_request(request).await {
                    Ok(()) => {
                        self.console.divider()?;
                        self.console.say("Request successfully fulfilled.")?;
                        return Ok(());
                    }
                    // Fulfilled out from under us between the scan and the call.
                    Err(err) if err.is_rejection() => {}
                    Err(err) => return Err(err),
                }
            }

            self.console.say("\nINVALID REQUEST ID!")?;
            self.console.say(
                "Most likely, that request doesn't exist, or you have already fulfilled it.",
            )?;
            prompt = "\nNow, please enter your desired request ID: ";
        }
        Err(StoreError::Cancelled)
    }

    async fn show_revenue(&mut self) -> Result<()> {
        let revenue = self.backend.total_revenue().await?;
        self.console.divider()?;
        self.console.say(&format!(
            "The total revenue from this store is: ${revenue}."
        ))?;
        Ok(())
    }
}
