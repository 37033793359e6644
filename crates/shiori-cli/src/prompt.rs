//! Console prompts: category, search text, candidate choice, score and status.

use std::io::{BufRead, Write};

use shiori_api::{Candidate, Category};
use shiori_core::models::{parse_score, UserAnnotation, WatchStatus, MAX_SCORE};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before all questions were answered")]
    Closed,

    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rejected answer. The message is shown to the user before asking again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidInput(pub String);

/// Asks questions on `output` and reads answers line by line from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Print a line for the user.
    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, InvalidInput>,
    ) -> Result<T, PromptError> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::debug!(answer = answer.as_str(), error = %e, "Rejected input");
                    writeln!(self.output, "{e}")?;
                }
            }
        }
    }

    pub fn choose_category(&mut self) -> Result<Category, PromptError> {
        self.say("Select type:")?;
        for (i, category) in Category::ALL.iter().enumerate() {
            self.say(&format!("{}: {category}", i + 1))?;
        }
        self.ask_until("Your choice: ", parse_category)
    }

    pub fn ask_query(&mut self) -> Result<String, PromptError> {
        self.ask_until("Search: ", |answer| {
            if answer.is_empty() {
                Err(InvalidInput("Please enter a title to search for.".into()))
            } else {
                Ok(answer.to_string())
            }
        })
    }

    pub fn choose_candidate<'a>(
        &mut self,
        candidates: &'a [Candidate],
    ) -> Result<&'a Candidate, PromptError> {
        self.say("")?;
        self.say("Select one:")?;
        for (i, candidate) in candidates.iter().enumerate() {
            self.say(&format!("{}: {}", i + 1, candidate.display_title()))?;
        }
        let index = self.ask_until("Your choice: ", |answer| {
            parse_selection(answer, candidates.len())
        })?;
        Ok(&candidates[index])
    }

    pub fn ask_annotation(&mut self, category: Category) -> Result<UserAnnotation, PromptError> {
        let raw_score = self.ask(&format!("Score out of {MAX_SCORE}?: "))?;
        let score = parse_score(&raw_score);
        if score.is_none() && !raw_score.is_empty() {
            tracing::warn!(
                input = raw_score.as_str(),
                "Score is not a whole number from 0 to {MAX_SCORE}, leaving it empty"
            );
        }

        self.say("")?;
        self.say("Status?")?;
        for status in WatchStatus::ALL {
            self.say(&format!("{}: {}", status.menu_code(), status.label(category)))?;
        }
        let status = WatchStatus::from_menu_code(&self.ask("Status Option: ")?);

        Ok(UserAnnotation { score, status })
    }
}

/// Accept a menu number or the category name.
pub fn parse_category(answer: &str) -> Result<Category, InvalidInput> {
    match answer.trim() {
        "1" => Ok(Category::Anime),
        "2" => Ok(Category::Manga),
        other => other
            .parse()
            .map_err(|_| InvalidInput(format!("Invalid choice {other:?}: enter 1 or 2."))),
    }
}

/// Turn a 1-based menu answer into an index into a list of `len` items.
pub fn parse_selection(answer: &str, len: usize) -> Result<usize, InvalidInput> {
    let choice: usize = answer.trim().parse().map_err(|_| {
        InvalidInput(format!(
            "Invalid choice {answer:?}: enter a number from 1 to {len}."
        ))
    })?;
    if (1..=len).contains(&choice) {
        Ok(choice - 1)
    } else {
        Err(InvalidInput(format!(
            "Choice {choice} is out of range: enter a number from 1 to {len}."
        )))
    }
}
