use anyhow::Result;
use std::io::{BufRead, Write};

use crate::error::ValidationError;

/// Line based conversation with the user.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }

    pub fn say<S: AsRef<str>>(&mut self, text: S) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    pub fn warn<S: AsRef<str>>(&mut self, text: S) -> Result<()> {
        self.say(format!("⚠️  {}", text.as_ref()))
    }

    /// `None` once the input is exhausted.
    pub fn ask(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Asks again until `parse` accepts the answer.
    pub fn ask_valid<T, F>(&mut self, label: &str, mut parse: F) -> Result<Option<T>>
    where
        F: FnMut(&str) -> Result<T, ValidationError>,
    {
        loop {
            let line = match self.ask(label)? {
                Some(line) => line,
                None => return Ok(None),
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.warn(e.to_string())?,
            }
        }
    }

    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = self.ask(label)?.unwrap_or_default().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}
