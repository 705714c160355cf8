use std::io::{BufRead, Write};

use async_trait::async_trait;

use super::LinkPrompt;
use crate::errors::{AppError, Result};

/// Reads the answer from stdin, asking again until a non-blank line arrives.
pub struct StdinPrompt;

#[async_trait]
impl LinkPrompt for StdinPrompt {
    async fn prompt(&self, label: &str) -> Result<String> {
        let label = label.to_string();
        tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            read_answer(&mut stdin.lock(), &mut std::io::stderr(), &label)
        })
        .await
        .map_err(|e| AppError::Prompt(format!("prompt task failed: {}", e)))?
    }
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    loop {
        write!(output, "{}", label)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::Prompt("input closed before a link was entered".to_string()));
        }

        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}
