use crate::error::{Result, StoreError};
use std::io::{BufRead, Write};

/// How many times a single prompt re-asks before giving up and returning
/// control to the menu.
pub const MAX_INPUT_ATTEMPTS: usize = 3;

const DIVIDER: &str = "\n-----------------------------------------------------\n";

/// Line-oriented prompt/response console, generic over its input and output
/// streams so tests can drive whole sessions from byte slices.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn divider(&mut self) -> Result<()> {
        writeln!(self.output, "{DIVIDER}")?;
        Ok(())
    }

    /// Prints `prompt` and reads one line, trimmed. `None` means end of
    /// input, which cancels whatever flow is in progress.
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn ask_lowercase(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self.ask(prompt)?.map(|line| line.to_lowercase()))
    }

    /// Prompts with `first`, then with `retry` after each rejected answer,
    /// up to [`MAX_INPUT_ATTEMPTS`] times. Rejections are validation-class
    /// errors from `parse`; anything else propagates immediately. Exhausted
    /// attempts and end-of-input both cancel.
    pub fn ask_retry<T>(
        &mut self,
        first: &str,
        retry: &str,
        mut parse: impl FnMut(&str) -> Result<T>,
    ) -> Result<T> {
        let mut prompt = first;
        for _ in 0..MAX_INPUT_ATTEMPTS {
            let Some(line) = self.ask(prompt)? else {
                return Err(StoreError::Cancelled);
            };
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rejection() => prompt = retry,
                Err(err) => return Err(err),
            }
        }
        Err(StoreError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductId;

    fn console<'a>(script: &'a [u8], out: &'a mut Vec<u8>) -> Console<&'a [u8], &'a mut Vec<u8>> {
        Console::new(script, out)
    }

    #[test]
    fn test_ask_trims_and_detects_eof() {
        let mut out = Vec::new();
        let mut c = console(b"  hello  \n", &mut out);
        assert_eq!(c.ask("> ").unwrap(), Some("hello".to_string()));
        assert_eq!(c.ask("> ").unwrap(), None);
    }

    #[test]
    fn test_ask_retry_accepts_second_attempt() {
        let mut out = Vec::new();
        let mut c = console(b"nope\n42\n", &mut out);
        let n = c
            .ask_retry("n? ", "again: ", |line| {
                line.parse::<u32>()
                    .map_err(|_| StoreError::Validation("not a number".into()))
            })
            .unwrap();
        assert_eq!(n, 42);
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("again: "));
    }

    #[test]
    fn test_ask_retry_is_bounded() {
        let mut out = Vec::new();
        let mut c = console(b"a\nb\nc\nd\n", &mut out);
        let result = c.ask_retry("id: ", "id: ", |line| line.parse::<ProductId>());
        assert!(matches!(result, Err(StoreError::Cancelled)));
        // The fourth line must still be unread.
        assert_eq!(c.ask("").unwrap(), Some("d".to_string()));
    }

    #[test]
    fn test_ask_retry_cancels_on_eof() {
        let mut out = Vec::new();
        let mut c = console(b"bad\n", &mut out);
        let result = c.ask_retry("id: ", "id: ", |line| line.parse::<ProductId>());
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }
}
