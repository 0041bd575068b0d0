//! Command dispatch

use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, ShowFormat};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::cli::session::{RunMode, Session};
use crate::config::{expand_path, global_config_path, IdStyle, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Load settings, applying flags that override config.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.sequential_ids {
        settings.id_style = IdStyle::Sequential;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if cli.no_color {
        output::disable_colors();
    }

    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => config_command(cli, command),
        Some(Commands::Show { format }) => show(cli, *format),
        Some(Commands::Run { file, keep_going }) => run_script(cli, file, *keep_going),
        Some(Commands::Shell) | None => shell(cli),
    }
}

#[instrument(skip(cli))]
fn shell(cli: &Cli) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let mut session = Session::new(container.editor());

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    run_shell(&mut session, stdin.lock(), &mut io::stdout(), interactive)
}

/// Drive a session from `input`. Piped input runs like `run --keep-going`.
fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    interactive: bool,
) -> CliResult<()> {
    if interactive {
        output::header("coltree: type 'help' for commands, 'quit' to leave");
        output::info(&session.render(ShowFormat::Table)?);
        session.run(input, out, RunMode::Interactive)?;
        println!();
        Ok(())
    } else {
        session.run(input, out, RunMode::Script { keep_going: true })
    }
}

#[instrument(skip(cli))]
fn run_script(cli: &Cli, file: &Path, keep_going: bool) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let mut session = Session::new(container.editor());

    let path = expand_path(file);
    let handle = std::fs::File::open(&path)
        .map_err(|e| InfraError::io(format!("open {}", path.display()), e))?;

    session.run(
        BufReader::new(handle),
        &mut io::stdout(),
        RunMode::Script { keep_going },
    )
}

fn show(cli: &Cli, format: ShowFormat) -> CliResult<()> {
    let container = ServiceContainer::new(load_settings(cli)?);
    let session = Session::new(container.editor());
    output::info(&session.render(format)?);
    Ok(())
}

fn config_command(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::info(&format!("global: {}{}", path.display(), state));
                }
                None => output::warning("no global config directory on this platform"),
            }
            if let Some(path) = &cli.config {
                output::info(&format!("explicit: {}", expand_path(path).display()));
            }
        }
    }
    Ok(())
}
