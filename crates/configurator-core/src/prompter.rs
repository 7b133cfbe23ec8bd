//! Line-based question and answer protocol
//!
//! Three kinds of questions are supported: free text, a closed set of
//! choices, and a value with a pre-filled default. Invalid answers are
//! re-asked rather than defaulted. End of input is the only way out of a
//! question without an answer and is reported as `ConfigureError::Aborted`.

use crate::error::{ConfigureError, Result};
use colored::Colorize;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Blocking prompter over any line reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompter bound to the process terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and hand back its writer
    pub fn into_output(self) -> W {
        self.output
    }

    /// Ask until a non-blank answer is given
    pub fn ask_free_text(&mut self, question: &str) -> Result<String> {
        loop {
            writeln!(self.output, "\n{}?", question)?;
            self.show_prompt()?;

            if let Some(answer) = self.read_line()? {
                let answer = answer.trim();
                if !answer.is_empty() {
                    return Ok(answer.to_string());
                }
            }

            write!(self.output, "\nYou need to provide an answer.")?;
        }
    }

    /// Ask for one of `answers`; an empty answer picks the first one
    ///
    /// Matching is case-insensitive, `y` and `n` stand for `yes` and `no`,
    /// and the matched answer is returned in lower case.
    pub fn ask_choice(&mut self, question: &str, answers: &[&str]) -> Result<String> {
        assert!(!answers.is_empty(), "a choice question needs answers");

        write!(self.output, "\n{}? [", question)?;
        self.print_choices(answers)?;

        loop {
            self.show_prompt()?;

            if let Some(line) = self.read_line()? {
                let mut answer = line.trim().to_lowercase();
                match answer.as_str() {
                    "y" => answer = "yes".to_string(),
                    "n" => answer = "no".to_string(),
                    "" => {
                        answer = answers[0].to_lowercase();
                        write!(self.output, "{}", answer.yellow())?;
                    }
                    _ => {}
                }

                if answers.iter().any(|a| a.to_lowercase() == answer) {
                    return Ok(answer);
                }
            }

            write!(self.output, "\nPossible answers are [")?;
            self.print_choices(answers)?;
        }
    }

    /// Show `default_value` and ask for a replacement
    ///
    /// Returns `None` when the operator accepts the default with an empty
    /// answer. A returned replacement is trimmed and never blank.
    pub fn ask_with_default(
        &mut self,
        question: &str,
        default_value: &str,
    ) -> Result<Option<String>> {
        let answer = loop {
            writeln!(
                self.output,
                "\n{} [{}]",
                question,
                default_value.underline()
            )?;
            self.show_prompt()?;

            if let Some(answer) = self.read_line()? {
                if answer.is_empty() {
                    break None;
                }
                let trimmed = answer.trim();
                if !trimmed.is_empty() {
                    break Some(trimmed.to_string());
                }
            }

            write!(self.output, "\n{}", "You need to input a valid value.".red())?;
        };

        write!(
            self.output,
            "{}",
            answer.as_deref().unwrap_or(default_value).yellow()
        )?;
        Ok(answer)
    }

    fn print_choices(&mut self, answers: &[&str]) -> Result<()> {
        for (i, answer) in answers.iter().enumerate() {
            if i == 0 {
                write!(self.output, " {}", answer.underline())?;
            } else {
                write!(self.output, " {}", answer)?;
            }
            if i != answers.len() - 1 {
                write!(self.output, " /")?;
            }
        }
        writeln!(self.output, " ]")?;
        Ok(())
    }

    fn show_prompt(&mut self) -> Result<()> {
        write!(self.output, "{} ", ">".green())?;
        self.output.flush()?;
        Ok(())
    }

    /// Read one line without its terminator; end of input aborts
    ///
    /// A line that is not valid UTF-8 yields `None` and is answered like
    /// any other invalid input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Err(ConfigureError::Aborted);
        }
        if bytes.ends_with(b"\n") {
            bytes.pop();
            if bytes.ends_with(b"\r") {
                bytes.pop();
            }
        }
        Ok(String::from_utf8(bytes).ok())
    }
}
