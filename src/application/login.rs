use crate::domain::ports::StoreBackend;
use crate::domain::session::{Role, Session};
use crate::error::Result;
use crate::interfaces::console::Console;
use std::io::{BufRead, Write};

/// How many full login attempts before the front end gives up.
pub const MAX_LOGIN_ATTEMPTS: usize = 5;

/// Two-step login: the username must exist among the role's identities, and
/// then the credential pair must pass the backend check. Attempts are
/// bounded; end of input or exhaustion yields `None` and no session.
pub async fn login<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    backend: &dyn StoreBackend,
    role: Role,
) -> Result<Option<Session>> {
    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let Some(username) = console.ask_lowercase("USERNAME: ")? else {
            return Ok(None);
        };
        let Some(password) = console.ask("PASSWORD: ")? else {
            return Ok(None);
        };

        if !backend.member_exists(role, &username).await? {
            console.say(&format!(
                "\nHmm, it doesn't look like you are a registered {}. Try again!\n",
                role.noun()
            ))?;
            continue;
        }

        if backend.check_credentials(&username, &password).await? {
            tracing::info!(username = %username, role = role.noun(), "login succeeded");
            return Ok(Some(Session::new(role, username)));
        }

        tracing::debug!(username = %username, "credential check failed");
        console.say("\nWRONG USERNAME OR PASSWORD. TRY AGAIN!\n")?;
    }
    Ok(None)
}
