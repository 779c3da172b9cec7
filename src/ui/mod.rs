//! Terminal interaction
//!
//! The company-name prompt and the end-of-run summary table.

pub mod readline;
pub mod summary;

use anyhow::Result;
use rustyline::error::ReadlineError;

use crate::financial::tickers::known_companies;

pub const COMPANY_PROMPT: &str = "Enter the company name: ";

/// Ask for a company name.
///
/// Ctrl+C and end of input count as no answer and yield an empty string.
pub fn prompt_company() -> Result<String> {
    let mut rl = readline::Readline::new(known_companies(), None)?;
    match rl.readline(COMPANY_PROMPT) {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}
