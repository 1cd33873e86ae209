//! User interaction operations (free-text prompts).

use anyhow::Result;

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
pub(crate) fn prompt_with_io<R: BufRead, W: Write>(
    message: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim().to_string())
}

impl RealRuntime {
    pub(crate) fn prompt_impl(&self, message: &str) -> Result<String> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        prompt_with_io(message, &mut stdin_lock, &mut stdout)
    }
}
