//! Interactive shell state.
//!
//! The shell reads clause and query input a line at a time; input is
//! complete when a `.` lands outside quotes at the end of a line. Lines
//! starting with `?-` run as queries and print their bindings; everything
//! else is asserted into the knowledge base. The binary in
//! `src/bin/prologue.rs` owns the editor loop.

use crate::engine::BindingSet;
use crate::error::Result;
use crate::prover::Prover;

/// Result of feeding one line to the shell.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// A `:`-prefixed meta-command.
    MetaCommand(MetaCommand),
    /// A complete statement ready to execute.
    Statement(String),
    /// More lines needed.
    Incomplete,
    /// Nothing to do.
    Empty,
}

/// Shell meta-commands.
#[derive(Debug, PartialEq)]
pub enum MetaCommand {
    Help,
    Quit,
    Reset,
    Unknown(String),
}

impl MetaCommand {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            ":help" | ":h" => MetaCommand::Help,
            ":quit" | ":q" => MetaCommand::Quit,
            ":reset" => MetaCommand::Reset,
            other => MetaCommand::Unknown(other.to_string()),
        }
    }
}

/// Outcome of executing one statement.
pub enum ExecuteOutcome {
    /// Query solutions, one formatted line per solution.
    Solutions(Vec<String>),
    /// Query with no solutions.
    NoSolutions,
    /// Clauses asserted.
    Asserted,
}

/// Shell state: a prover plus the multi-line input buffer.
pub struct ReplState {
    pub prover: Prover,
    pub input_buffer: String,
}

impl Default for ReplState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplState {
    /// Fresh state over the bundled engine.
    pub fn new() -> Self {
        Self {
            prover: Prover::sld(),
            input_buffer: String::new(),
        }
    }

    /// Reset to an empty knowledge base.
    pub fn reset(&mut self) {
        self.prover = Prover::sld();
        self.input_buffer.clear();
    }

    /// Process a line of input, buffering until a statement is complete.
    pub fn process_line(&mut self, line: &str) -> InputResult {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if self.input_buffer.is_empty() {
                return InputResult::Empty;
            }
            return InputResult::Incomplete;
        }

        // Meta-command (only at start, not in continuation)
        if trimmed.starts_with(':') && self.input_buffer.is_empty() {
            return InputResult::MetaCommand(MetaCommand::parse(trimmed));
        }

        if !self.input_buffer.is_empty() {
            self.input_buffer.push('\n');
        }
        self.input_buffer.push_str(line);

        if statement_complete(&self.input_buffer) {
            InputResult::Statement(std::mem::take(&mut self.input_buffer))
        } else {
            InputResult::Incomplete
        }
    }

    /// Force submit the current buffer (Ctrl-D).
    pub fn force_submit(&mut self) -> Option<String> {
        if self.input_buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.input_buffer))
        }
    }

    /// Execute a complete statement: `?- goal.` queries, anything else
    /// asserts clauses.
    pub fn execute(&mut self, source: &str) -> Result<ExecuteOutcome> {
        let trimmed = source.trim();
        if let Some(goal) = trimmed.strip_prefix("?-") {
            let mut solution = self.prover.solve(goal.trim())?;
            let mut lines = Vec::new();
            while let Some(set) = solution.next_solution() {
                lines.push(format_bindings(&set?));
            }
            if lines.is_empty() {
                Ok(ExecuteOutcome::NoSolutions)
            } else {
                Ok(ExecuteOutcome::Solutions(lines))
            }
        } else {
            self.prover.add_theory(trimmed)?;
            Ok(ExecuteOutcome::Asserted)
        }
    }
}

/// A statement is complete when it ends with a `.` outside quotes.
fn statement_complete(input: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut last_significant = ' ';
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == q {
                    if chars.peek() == Some(&q) {
                        chars.next();
                    } else {
                        quote = None;
                    }
                }
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                if !c.is_whitespace() {
                    last_significant = c;
                }
            }
        }
    }
    quote.is_none() && last_significant == '.'
}

fn format_bindings(set: &BindingSet) -> String {
    if set.is_empty() {
        return "true".to_string();
    }
    set.names()
        .filter_map(|name| set.get(name).map(|term| format!("{} = {}", name, term)))
        .collect::<Vec<_>>()
        .join(", ")
}
