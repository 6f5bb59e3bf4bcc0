//! Interactive yes/no confirmation used before destructive overwrites.

use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::io::{BufRead, Write};

pub const AFFIRMATIVE_ANSWERS: &[&str] = &["y", "yes", "1", "t", "true"];
pub const NEGATIVE_ANSWERS: &[&str] = &["n", "no", "0", "f", "false"];

/// Ask `question` on `output`, read one line from `input`. Case-insensitive.
/// Unrecognised answers are an error listing the accepted responses.
pub fn yes_no_question<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    write!(output, "{} {} [y/n] ", label, question).context("write prompt")?;
    output.flush().context("flush prompt")?;

    let mut answer = String::new();
    input.read_line(&mut answer).context("read answer")?;
    let answer = answer.trim().to_lowercase();

    if AFFIRMATIVE_ANSWERS.contains(&answer.as_str()) {
        Ok(true)
    } else if NEGATIVE_ANSWERS.contains(&answer.as_str()) {
        Ok(false)
    } else {
        bail!(
            "Invalid answer {:?}! Recognised responses: {}",
            answer,
            AFFIRMATIVE_ANSWERS
                .iter()
                .chain(NEGATIVE_ANSWERS)
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// [`yes_no_question`] on stdin/stdout.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    yes_no_question(question, &mut input, &mut output)
}
