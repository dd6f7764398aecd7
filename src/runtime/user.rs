//! User interaction operations (line prompts).

use anyhow::Result;

use super::RealRuntime;
use crate::error::InstallError;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
pub(crate) fn prompt_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(InstallError::InputClosed.into());
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

impl RealRuntime {
    pub(crate) fn prompt_impl(&self, message: &str) -> Result<String> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        prompt_with_io(message, &mut stdin_lock, &mut stdout)
    }
}
