use brickshop::application::customer::CustomerApp;
use brickshop::application::login::login;
use brickshop::application::{Diagnostics, init_tracing};
use brickshop::domain::ports::BackendBox;
use brickshop::domain::session::Role;
use brickshop::infrastructure::{ConnectionOpts, connect, demo};
use brickshop::interfaces::console::Console;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io;

/// Customer front end for the Brickshop: search the catalog, purchase,
/// request restocks, and review purchases.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionOpts,

    /// Emit raw backend diagnostics instead of operator-facing messages.
    #[arg(long)]
    debug: bool,

    /// Run against the seeded in-memory catalog instead of a database.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = if cli.debug {
        Diagnostics::Verbose
    } else {
        Diagnostics::Operator
    };
    init_tracing(diagnostics);

    let backend: BackendBox = if cli.demo {
        Box::new(demo::demo_store().await.into_diagnostic()?)
    } else {
        match connect(&cli.connection).await {
            Ok(backend) => backend,
            Err(err) => {
                if diagnostics.verbose() {
                    eprintln!("{err:?}");
                } else {
                    eprintln!("An error occurred, please contact the administrator.");
                }
                std::process::exit(1);
            }
        }
    };

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let mut console = Console::new(stdin, stdout);

    console
        .say("\n-------------------------- BRICKSHOP CUSTOMER LOGIN --------------------------")
        .into_diagnostic()?;
    let Some(session) = login(&mut console, backend.as_ref(), Role::Customer)
        .await
        .into_diagnostic()?
    else {
        eprintln!("Login aborted.");
        std::process::exit(1);
    };

    let app = CustomerApp::new(console, backend, session, diagnostics);
    app.run().await.into_diagnostic()?;
    Ok(())
}
