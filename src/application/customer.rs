use super::Diagnostics;
use super::sample::pick_for_display;
use crate::domain::order::{PurchaseId, Rating, SetListing, validate_review_text};
use crate::domain::ports::BackendBox;
use crate::domain::product::ProductId;
use crate::domain::session::Session;
use crate::error::{Result, StoreError};
use crate::interfaces::console::{Console, MAX_INPUT_ATTEMPTS};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CustomerChoice {
    Search,
    Purchase,
    Request,
    Review,
    Quit,
}

fn parse_choice(line: &str) -> Option<CustomerChoice> {
    match line {
        "a" => Some(CustomerChoice::Search),
        "b" => Some(CustomerChoice::Purchase),
        "c" => Some(CustomerChoice::Request),
        "d" => Some(CustomerChoice::Review),
        "q" => Some(CustomerChoice::Quit),
        _ => None,
    }
}

const BUDGET_MAX: u32 = 200;

/// The customer-facing session loop: search the catalog, purchase, request
/// restocks, and review purchases.
pub struct CustomerApp<R, W> {
    console: Console<R, W>,
    backend: BackendBox,
    session: Session,
    diagnostics: Diagnostics,
}

impl<R: BufRead, W: Write> CustomerApp<R, W> {
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
        self.console.say("HELLO AND WELCOME TO THE BRICKSHOP! :)")?;
        tracing::info!(username = self.session.username(), "customer session started");

        loop {
            self.console.divider()?;
            self.console.say("What best describes you?\n")?;
            self.console
                .say("  [a] - I want to learn more about some product(s).")?;
            self.console.say("  [b] - I know what I want to buy!")?;
            self.console
                .say("  [c] - I want to request an item that's out of stock.")?;
            self.console
                .say("  [d] - I want to review one of my purchases!")?;
            self.console.say("  [q] - Exit this app.")?;
            self.console.say("")?;

            let Some(answer) = self.console.ask_lowercase("Enter an option: ")? else {
                break;
            };
            let Some(choice) = parse_choice(&answer) else {
                continue;
            };
            if choice == CustomerChoice::Quit {
                break;
            }

            let outcome = self.dispatch(choice).await;
            self.report(outcome)?;
        }

        self.console.divider()?;
        self.console.say("Thanks for visiting the Brickshop!")?;
        self.console.divider()?;
        Ok(())
    }

    async fn dispatch(&mut self, choice: CustomerChoice) -> Result<()> {
        match choice {
            CustomerChoice::Search => self.search().await,
            CustomerChoice::Purchase => self.purchase().await,
            CustomerChoice::Request => self.request_restock().await,
            CustomerChoice::Review => self.write_review().await,
            CustomerChoice::Quit => Ok(()),
        }
    }

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
                    .say("\nAn error occurred! Please contact an employee.")
            }
        }
    }

    async fn search(&mut self) -> Result<()> {
        self.console.divider()?;
        self.console
            .say("Which of the following questions can I help you with?\n")?;
        self.console
            .say("  [a] - I have a maximum price in mind. What can I buy?")?;
        self.console
            .say("  [b] - I have a theme I want to explore. What sets are in that theme?")?;
        self.console.say(
            "  [c] - I have a product I want. How much does it cost? And what did other users rate it?",
        )?;
        self.console.say("  [q] - Back to the main menu.")?;
        self.console.say("")?;

        let Some(answer) = self.console.ask_lowercase("Enter an option: ")? else {
            return Err(StoreError::Cancelled);
        };
        match answer.as_str() {
            "a" => self.search_by_budget().await,
            "b" => self.search_by_theme().await,
            "c" => self.price_and_rating().await,
            _ => Ok(()),
        }
    }

    async fn search_by_budget(&mut self) -> Result<()> {
        let budget = self.console.ask_retry(
            "\nEnter your maximum budget ($): ",
            "\nSorry, we only accept numbers between 1 and 200 (inclusive).\nAgain, enter your maximum budget ($): ",
            |line| {
                line.parse::<u32>()
                    .ok()
                    .filter(|n| (1..=BUDGET_MAX).contains(n))
                    .ok_or_else(|| {
                        StoreError::Validation("budget must be between 1 and 200".to_string())
                    })
            },
        )?;

        let rows = self.backend.sets_within_budget(Decimal::from(budget)).await?;
        self.console.divider()?;
        if rows.is_empty() {
            self.console
                .say("Actually, nevermind. There are no sets within your budget. Sorry!")?;
        } else {
            self.console.say("Here are some options for you:")?;
            self.show_listings(&rows)?;
        }
        Ok(())
    }

    async fn search_by_theme(&mut self) -> Result<()> {
        let Some(theme) = self.console.ask(
            "\nWhat theme are you interested in? \n(Examples: Super Heroes, Marvel, Star Wars)\n\n",
        )?
        else {
            return Err(StoreError::Cancelled);
        };

        let rows = self.backend.sets_in_theme(&theme).await?;
        self.console.divider()?;
        if rows.is_empty() {
            self.console.say("Sorry, there are no sets in that theme.")?;
            self.console.say("Try again with another theme next time?")?;
        } else {
            self.console
                .say("Here are some sets you might get interested in.")?;
            self.show_listings(&rows)?;
        }
        Ok(())
    }

    fn show_listings(&mut self, rows: &[SetListing]) -> Result<()> {
        for row in pick_for_display(rows) {
            self.console
                .say(&format!("\nThe \"{}\" set is ${}.", row.name, row.price))?;
            self.console.say(&format!(
                "Remember this product ID to purchase: {}.",
                row.product
            ))?;
        }
        Ok(())
    }

    async fn price_and_rating(&mut self) -> Result<()> {
        let product = self.console.ask_retry(
            "\nEnter the product ID of the product you're interested in: ",
            "\nSorry, set IDs are integers between 1 and 11673 (inclusive).\nPart IDs are integers between 100000 and 125992.\nAgain, enter the product ID you wish to query: ",
            |line| line.parse::<ProductId>(),
        )?;

        let info = self.backend.price_and_rating(product).await?;
        self.console.divider()?;
        self.console.say(&format!("The set costs ${}.", info.price))?;
        match info.rating {
            Some(stars) => self
                .console
                .say(&format!("Its average rating is {stars} stars."))?,
            None => self
                .console
                .say("There are currently no ratings for that product.")?,
        }
        Ok(())
    }

    async fn purchase(&mut self) -> Result<()> {
        let mut prompt = "\nPlease enter the product ID of the item you wish to purchase: ";
        for _ in 0..MAX_INPUT_ATTEMPTS {
            let Some(line) = self.console.ask(prompt)? else {
                return Err(StoreError::Cancelled);
            };

            if let Ok(product) = line.parse::<ProductId>()
                && matches!(self.available(product).await?, Some(q) if q > 0)
            {
                // The inventory read above is advisory; the backend re-checks
                // atomically and may still reject.
                match self
                    .backend
                    .record_purchase(product, self.session.username())
                    .await
                {
                    Ok(purchase) => {
                        self.console.divider()?;
                        self.console.say("Thanks for your purchase!\n")?;
                        self.console.say(&format!(
                            "Remember your purchase ID to write a review: {purchase}."
                        ))?;
                        return Ok(());
                    }
                    Err(err) if err.is_rejection() => {}
                    Err(err) => return Err(err),
                }
            }

            self.console.say(
                "\nSORRY, YOU HAVE ENTERED AN INVALID PRODUCT ID, OR THE ITEM IS OUT OF STOCK.\n",
            )?;
            self.console.say(
                "Set IDs are integers between 1 and 11673 (inclusive), and part IDs are integers between 100000 and 125992.",
            )?;
            self.console
                .say("Remember, you can always request an out-of-stock product!")?;
            prompt = "\nAgain, enter the product ID you wish to purchase: ";
        }
        Err(StoreError::Cancelled)
    }

    async fn request_restock(&mut self) -> Result<()> {
        let mut prompt = "\nPlease enter the product ID of the item you wish to request: ";
        for _ in 0..MAX_INPUT_ATTEMPTS {
            let Some(line) = self.console.ask(prompt)? else {
                return Err(StoreError::Cancelled);
            };

            if let Ok(product) = line.parse::<ProductId>()
                && matches!(self.available(product).await?, Some(q) if q <= 0)
            {
                match self
                    .backend
                    .record_request(product, self.session.username())
                    .await
                {
                    Ok(request) => {
                        tracing::debug!(request = request.get(), "restock request placed");
                        self.console.divider()?;
                        self.console.say("Request has been successfully made.")?;
                        return Ok(());
                    }
                    Err(err) if err.is_rejection() => {}
                    Err(err) => return Err(err),
                }
            }

            self.console.say(
                "\nSORRY, YOU ENTERED AN INVALID PRODUCT ID, OR THE ITEM IS ALREADY IN STOCK.",
            )?;
            prompt = "\nAgain, enter the product ID you wish to request: ";
        }
        Err(StoreError::Cancelled)
    }

    /// Advisory inventory read; `None` means the product is unknown, which
    /// both the purchase and request flows treat as invalid input.
    async fn available(&mut self, product: ProductId) -> Result<Option<i64>> {
        match self.backend.inventory(product).await {
            Ok(quantity) => Ok(Some(quantity)),
            Err(err) if err.is_rejection() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn write_review(&mut self) -> Result<()> {
        let purchase = self.ask_reviewable_purchase().await?;

        let rating = self.console.ask_retry(
            "\nHow would you rate this product? Please enter an integer 1-5: ",
            "\nSorry, we only accept integers between 1 and 5 (inclusive).\nAgain, enter your rating: ",
            |line| {
                line.parse::<u8>()
                    .map_err(|_| {
                        StoreError::Validation("ratings are integers between 1 and 5".to_string())
                    })
                    .and_then(Rating::new)
            },
        )?;

        let text = self.console.ask_retry(
            "\nPlease enter a brief review that is less than 500 characters: ",
            "\nSorry, that review is too long. Please keep it under 500 characters: ",
            |line| validate_review_text(line).map(str::to_string),
        )?;

        self.backend.record_review(purchase, rating, &text).await?;
        self.console.divider()?;
        self.console.say("Thanks for your review!")?;
        Ok(())
    }

    /// A reviewable purchase must parse, belong to this session's customer,
    /// and have no review yet. Checks run fresh on every attempt; the
    /// mutation is never reached for a rejected ID.
    async fn ask_reviewable_purchase(&mut self) -> Result<PurchaseId> {
        let mut prompt = "\nPlease enter the purchase ID of the purchase you're reviewing: ";
        for _ in 0..MAX_INPUT_ATTEMPTS {
            let Some(line) = self.console.ask(prompt)? else {
                return Err(StoreError::Cancelled);
            };

            if let Ok(purchase) = line.parse::<PurchaseId>() {
                let mine = self
                    .backend
                    .purchases_of(self.session.username())
                    .await?
                    .contains(&purchase);
                if mine && !self.backend.has_review(purchase).await? {
                    return Ok(purchase);
                }
            }

            self.console.say("\nINVALID PURCHASE ID!")?;
            self.console.say(
                "Most likely, that purchase already has a review, or you didn't make that purchase.",
            )?;
            prompt = "\nNow, please enter the desired purchase ID again: ";
        }
        Err(StoreError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::StoreBackend;
    use crate::domain::session::Role;
    use crate::infrastructure::demo::demo_store;
    use crate::infrastructure::in_memory::InMemoryStore;

    async fn run_customer(store: &InMemoryStore, username: &str, script: &str) -> String {
        let mut out = Vec::new();
        let app = CustomerApp::new(
            Console::new(script.as_bytes(), &mut out),
            Box::new(store.clone()),
            Session::new(Role::Customer, username),
            Diagnostics::Operator,
        );
        app.run().await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_request_out_of_stock_product_is_listed() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "c\n7\nq\n").await;
        assert!(rendered.contains("Request has been successfully made."));

        let pending = store.pending_requests().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].product, ProductId::new(7).unwrap());
    }

    #[tokio::test]
    async fn test_request_rejected_for_in_stock_product() {
        let store = demo_store().await.unwrap();
        // 608 has stock; all three attempts fail, then back to the menu.
        let rendered = run_customer(&store, "alice", "c\n608\n608\n608\nq\n").await;
        assert!(rendered.contains("THE ITEM IS ALREADY IN STOCK"));
        assert!(store.pending_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchase_prints_generated_id() {
        let store = demo_store().await.unwrap();
        let before = store
            .inventory(ProductId::new(608).unwrap())
            .await
            .unwrap();

        let rendered = run_customer(&store, "alice", "b\n608\nq\n").await;
        assert!(rendered.contains("Thanks for your purchase!"));
        assert!(rendered.contains("Remember your purchase ID to write a review: 1."));
        assert_eq!(
            store.inventory(ProductId::new(608).unwrap()).await.unwrap(),
            before - 1
        );
    }

    #[tokio::test]
    async fn test_purchase_rejected_when_out_of_stock() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "b\n7\n18\n10135\nq\n").await;
        assert!(rendered.contains("OUT OF STOCK"));
        assert!(store.purchases_of("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_happy_path() {
        let store = demo_store().await.unwrap();
        let purchase = store
            .record_purchase(ProductId::new(608).unwrap(), "alice")
            .await
            .unwrap();

        let script = format!("d\n{purchase}\n5\nGreat set, sturdy hull.\nq\n");
        let rendered = run_customer(&store, "alice", &script).await;
        assert!(rendered.contains("Thanks for your review!"));
        assert!(store.has_review(purchase).await.unwrap());
    }

    #[tokio::test]
    async fn test_already_reviewed_purchase_never_reaches_mutation() {
        let store = demo_store().await.unwrap();
        let purchase = store
            .record_purchase(ProductId::new(608).unwrap(), "alice")
            .await
            .unwrap();
        store
            .record_review(purchase, Rating::new(4).unwrap(), "fine")
            .await
            .unwrap();

        // Three attempts at the same reviewed purchase, then menu, then quit.
        let script = format!("d\n{purchase}\n{purchase}\n{purchase}\nq\n");
        let rendered = run_customer(&store, "alice", &script).await;
        assert!(rendered.contains("INVALID PURCHASE ID!"));
        assert!(rendered.contains("returning to the menu"));
        // Never asked for a rating, so the flow stopped before the mutation.
        assert!(!rendered.contains("How would you rate this product?"));
    }

    #[tokio::test]
    async fn test_review_of_someone_elses_purchase_rejected() {
        let store = demo_store().await.unwrap();
        let purchase = store
            .record_purchase(ProductId::new(608).unwrap(), "carol")
            .await
            .unwrap();

        let script = format!("d\n{purchase}\n{purchase}\n{purchase}\nq\n");
        let rendered = run_customer(&store, "alice", &script).await;
        assert!(rendered.contains("INVALID PURCHASE ID!"));
        assert!(!store.has_review(purchase).await.unwrap());
    }

    #[tokio::test]
    async fn test_theme_search_prints_nothing_found() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "a\nb\nPirates\nq\n").await;
        assert!(rendered.contains("Sorry, there are no sets in that theme."));
    }

    #[tokio::test]
    async fn test_theme_search_lists_matching_sets() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "a\nb\nStar Wars\nq\n").await;
        assert!(rendered.contains("Here are some sets you might get interested in."));
        assert!(rendered.contains("\"Star Cruiser\""));
    }

    #[tokio::test]
    async fn test_budget_search_validates_bounds() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "a\na\n999\n50\nq\n").await;
        assert!(rendered.contains("we only accept numbers between 1 and 200"));
        assert!(rendered.contains("Here are some options for you:"));
    }

    #[tokio::test]
    async fn test_price_and_rating_without_reviews() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "a\nc\n608\nq\n").await;
        assert!(rendered.contains("The set costs $39.99."));
        assert!(rendered.contains("There are currently no ratings for that product."));
    }

    #[tokio::test]
    async fn test_price_and_rating_with_reviews() {
        let store = demo_store().await.unwrap();
        let purchase = store
            .record_purchase(ProductId::new(608).unwrap(), "alice")
            .await
            .unwrap();
        store
            .record_review(purchase, Rating::new(4).unwrap(), "solid")
            .await
            .unwrap();

        let rendered = run_customer(&store, "alice", "a\nc\n608\nq\n").await;
        assert!(rendered.contains("Its average rating is 4 stars."));
    }

    #[tokio::test]
    async fn test_search_submenu_falls_back_to_main_menu() {
        let store = demo_store().await.unwrap();
        let rendered = run_customer(&store, "alice", "a\nz\nq\n").await;
        assert!(rendered.contains("Thanks for visiting the Brickshop!"));
    }
}
