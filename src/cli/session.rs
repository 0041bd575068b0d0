//! Interactive editing session
//!
//! Each input line is split into words (quotes group words) and parsed with
//! clap. The session owns a `ColumnEditor`; every line runs to completion
//! before the next one is read.

use std::io::{BufRead, Write};

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, instrument};

use crate::application::services::ColumnEditor;
use crate::application::FormAction;
use crate::cli::args::{ColumnTypeArg, ShowFormat};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, render};
use crate::infrastructure::InfraError;

/// One session line.
#[derive(Parser, Debug)]
#[command(name = "session", no_binary_name = true, disable_version_flag = true)]
#[command(help_template = "{all-args}")]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum SessionCommand {
    /// Add a top-level column (kept before the last column)
    New {
        /// Column type
        #[arg(short = 't', long = "type", value_enum)]
        column_type: Option<ColumnTypeArg>,
        /// Column title
        #[arg(allow_hyphen_values = true)]
        title: Vec<String>,
    },

    /// Add a child column
    Child {
        /// Parent column id
        id: String,
        /// Column type
        #[arg(short = 't', long = "type", value_enum)]
        column_type: Option<ColumnTypeArg>,
        /// Column title
        #[arg(allow_hyphen_values = true)]
        title: Vec<String>,
    },

    /// Change type and/or title of a column
    Edit {
        /// Column id
        id: String,
        /// New column type
        #[arg(short = 't', long = "type", value_enum)]
        column_type: Option<ColumnTypeArg>,
        /// New column title
        #[arg(allow_hyphen_values = true)]
        title: Vec<String>,
    },

    /// Delete a column and its children
    #[command(visible_alias = "delete")]
    Rm {
        /// Column id
        id: String,
    },

    /// Show columns as a table
    Show,

    /// Show columns as a tree
    Tree,

    /// Print columns as TOML
    Dump,

    /// Restore the built-in columns
    Reset,

    /// Leave the session
    #[command(visible_alias = "exit")]
    Quit,
}

/// Result of executing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading; optional text to print
    Continue(Option<String>),
    /// Stop the session
    Quit,
}

/// Split a line into words. Single or double quotes group words; a backslash
/// escapes the next character outside single quotes.
pub fn split_line(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::InvalidArgs("unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn join_title(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Session over a column editor.
pub struct Session {
    editor: ColumnEditor,
}

impl Session {
    pub fn new(editor: ColumnEditor) -> Self {
        Self { editor }
    }

    pub fn editor(&self) -> &ColumnEditor {
        &self.editor
    }

    /// Render the current forest.
    pub fn render(&self, format: ShowFormat) -> CliResult<String> {
        let forest = self.editor.forest();
        Ok(match format {
            ShowFormat::Table => render::render_table(forest),
            ShowFormat::Tree => render::render_tree(forest),
            ShowFormat::Toml => render::render_toml(forest)?,
        })
    }

    /// Execute a single line. Blank lines and `#` comments do nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn execute_line(&mut self, line: &str) -> CliResult<Outcome> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Outcome::Continue(None));
        }

        let words = split_line(trimmed)?;
        let parsed = match SessionLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp) => {
                return Ok(Outcome::Continue(Some(e.to_string().trim_end().to_string())));
            }
            Err(e) => return Err(CliError::Usage(e.to_string().trim_end().to_string())),
        };
        debug!("command: {:?}", parsed.command);

        self.execute(parsed.command)
    }

    fn execute(&mut self, command: SessionCommand) -> CliResult<Outcome> {
        let message = match command {
            SessionCommand::New { column_type, title } => {
                let id = self.submit(FormAction::New, column_type, &title)?;
                format!("created {id}")
            }
            SessionCommand::Child {
                id,
                column_type,
                title,
            } => {
                let child = self.submit(FormAction::NewChild { parent_id: id }, column_type, &title)?;
                format!("created {child}")
            }
            SessionCommand::Edit {
                id,
                column_type,
                title,
            } => {
                let id = self.submit(FormAction::Edit { id }, column_type, &title)?;
                format!("updated {id}")
            }
            SessionCommand::Rm { id } => {
                let removed = self.editor.delete(&id)?;
                let count = removed.children.len();
                if count == 0 {
                    format!("deleted {removed}")
                } else {
                    format!("deleted {removed} with {count} direct children")
                }
            }
            SessionCommand::Show => self.render(ShowFormat::Table)?,
            SessionCommand::Tree => self.render(ShowFormat::Tree)?,
            SessionCommand::Dump => self.render(ShowFormat::Toml)?,
            SessionCommand::Reset => {
                self.editor.reset();
                "restored built-in columns".to_string()
            }
            SessionCommand::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(Some(message)))
    }

    /// Open the form for `action`, fill in what the line provided, submit.
    fn submit(
        &mut self,
        action: FormAction,
        column_type: Option<ColumnTypeArg>,
        title: &[String],
    ) -> CliResult<String> {
        let mut form = self.editor.open(action)?;
        if let Some(t) = column_type {
            form = form.with_type(t.into());
        }
        if let Some(t) = join_title(title) {
            form = form.with_title(t);
        }
        Ok(self.editor.submit(form)?)
    }

    /// Read lines until end of input or `quit`.
    ///
    /// Interactive sessions report errors and keep going. Scripts stop at the
    /// first failing line unless `keep_going` is set; then every failure is
    /// reported and the run ends with `CliError::Failed`.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        mode: RunMode,
    ) -> CliResult<()> {
        let mut failures = 0;
        let mut first: Option<CliError> = None;
        if mode == RunMode::Interactive {
            output::prompt(&self.editor.settings().prompt);
        }

        for (idx, line) in input.lines().enumerate() {
            let line = line.map_err(|e| InfraError::io("read input", e))?;
            match self.execute_line(&line) {
                Ok(Outcome::Quit) => break,
                Ok(Outcome::Continue(Some(text))) => {
                    writeln!(out, "{text}").map_err(|e| InfraError::io("write output", e))?;
                }
                Ok(Outcome::Continue(None)) => {}
                Err(e) => {
                    failures += 1;
                    match mode {
                        RunMode::Script { keep_going: false } => {
                            return Err(CliError::Line {
                                line: idx + 1,
                                source: Box::new(e),
                            });
                        }
                        RunMode::Script { keep_going: true } => {
                            let err = CliError::Line {
                                line: idx + 1,
                                source: Box::new(e),
                            };
                            output::error(&err);
                            if first.is_none() {
                                first = Some(err);
                            }
                        }
                        RunMode::Interactive => print_error(&e),
                    }
                }
            }
            if mode == RunMode::Interactive {
                output::prompt(&self.editor.settings().prompt);
            }
        }

        match first {
            Some(first) => Err(CliError::Failed {
                failures,
                first: Box::new(first),
            }),
            None => Ok(()),
        }
    }
}

/// How `Session::run` treats input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Interactive,
    Script { keep_going: bool },
}

fn print_error(e: &CliError) {
    if let CliError::Infra(InfraError::Application(app)) = e {
        if !app.field_errors().is_empty() {
            for field in app.field_errors() {
                output::failure(field);
            }
            return;
        }
    }
    output::error(e);
}
