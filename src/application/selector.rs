//! Candidate selection.
//!
//! Resolves the located databases to exactly one path, asking the user when
//! there is more than one and the run is interactive.

use std::io::{BufRead, Write};
use std::path::Path;

use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{AppError, Candidate, Result};

use super::exporters::format_timestamp;

/// Outcome of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Export this database.
    Selected(Candidate),
    /// The user chose to quit.
    Quit,
}

/// Picks one candidate, prompting on `prompt` and reading from `input`.
pub struct CandidateSelector<R, W> {
    quiet: bool,
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> CandidateSelector<R, W> {
    /// Creates a selector. In quiet mode it never prompts.
    pub const fn new(quiet: bool, input: R, prompt: W) -> Self {
        Self {
            quiet,
            input,
            prompt,
        }
    }

    /// Resolves `candidates` found under `root`.
    ///
    /// # Errors
    /// Returns `DatabaseNotFound` for an empty list, `AmbiguousCandidates`
    /// for several candidates in quiet mode, or an IO error if the prompt
    /// cannot be written or the input cannot be read.
    pub fn select(&mut self, root: &Path, mut candidates: Vec<Candidate>) -> Result<Selection> {
        match candidates.len() {
            0 => {
                tracing::info!("not found");
                Err(AppError::DatabaseNotFound {
                    root: root.to_path_buf(),
                })
            }
            1 => {
                let candidate = candidates.remove(0);
                tracing::info!("found in \"{}\"", candidate.path.display());
                Ok(Selection::Selected(candidate))
            }
            count if self.quiet => Err(AppError::AmbiguousCandidates { count }),
            _ => self.prompt_choice(candidates),
        }
    }

    fn prompt_choice(&mut self, mut candidates: Vec<Candidate>) -> Result<Selection> {
        let last = candidates.len() - 1;
        self.write_prompt(&format!(
            "{} sms databases found, pick up one: [0, {last}]\n{}\nq. quit\n",
            candidates.len(),
            candidate_table(&candidates)
        ))?;

        loop {
            self.write_prompt("choice: ")?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| AppError::io("Failed to read choice", e))?;

            // End of input: nobody left to answer.
            if read == 0 {
                return Ok(Selection::Quit);
            }

            let choice = line.trim().to_lowercase();
            if choice == "q" {
                return Ok(Selection::Quit);
            }

            match choice.parse::<usize>() {
                Ok(index) if index <= last => {
                    let candidate = candidates.swap_remove(index);
                    tracing::info!("selected \"{}\"", candidate.path.display());
                    return Ok(Selection::Selected(candidate));
                }
                Ok(index) => {
                    self.write_prompt(&format!("{index} is out of range [0, {last}]\n"))?;
                }
                Err(_) => {
                    self.write_prompt("not a number\n")?;
                }
            }
        }
    }

    fn write_prompt(&mut self, text: &str) -> Result<()> {
        self.prompt
            .write_all(text.as_bytes())
            .and_then(|()| self.prompt.flush())
            .map_err(|e| AppError::io("Failed to write prompt", e))
    }
}

/// Formats the candidate list for the selection menu.
fn candidate_table(candidates: &[Candidate]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Messages", "Latest message", "Path"]);

    for (i, candidate) in candidates.iter().enumerate() {
        table.add_row(vec![
            i.to_string(),
            candidate.count.to_string(),
            format_timestamp(candidate.latest_timestamp),
            candidate.path.display().to_string(),
        ]);
    }

    table.to_string()
}
