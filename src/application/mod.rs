pub mod admin;
pub mod customer;
pub mod login;
pub mod sample;

use tracing_subscriber::EnvFilter;

/// Diagnostics switch for the front ends: operator mode swallows backend
/// errors into one generic line; verbose mode surfaces the raw diagnostic
/// and terminates the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Diagnostics {
    #[default]
    Operator,
    Verbose,
}

impl Diagnostics {
    pub fn verbose(self) -> bool {
        self == Diagnostics::Verbose
    }
}

/// Installs the stderr tracing subscriber. Prompts go to stdout, so logs
/// never interleave with them.
pub fn init_tracing(diagnostics: Diagnostics) {
    let filter = if diagnostics.verbose() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
