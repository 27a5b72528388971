//! The interactive command loop on stdin.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

use cs_app::{App, DeleteFailurePolicy, ExportOptions, PipelineError};
use cs_core::content::ContentKind;
use cs_core::hotkey::{ModifierSet, ShortcutConfig, ShortcutConfigError};
use cs_core::security::SecretString;

use super::wiring::Wired;
use crate::adapters::render_entry;

const HELP: &str = "commands:
  save [--force]                    save history under a new password
  load                              load saved history
  list                              show the history
  urls <index>                      URLs in text entry <index>
  shortcuts <on|off> [mods] [count] e.g. `shortcuts on Ctrl+Alt 9`
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Save { force: bool },
    Load,
    List,
    Urls(u32),
    Shortcuts(ShortcutConfig),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try `help`")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Shortcut(#[from] ShortcutConfigError),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("save", []) => Command::Save { force: false },
        ("save", ["--force"]) => Command::Save { force: true },
        ("save", _) => return Err(CommandError::Usage("save [--force]")),
        ("load", []) => Command::Load,
        ("list", []) => Command::List,
        ("urls", [index]) => Command::Urls(
            index
                .parse()
                .map_err(|_| CommandError::Usage("urls <index>"))?,
        ),
        ("urls", _) => return Err(CommandError::Usage("urls <index>")),
        ("shortcuts", args) => Command::Shortcuts(parse_shortcuts(args)?),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_shortcuts(args: &[&str]) -> Result<ShortcutConfig, CommandError> {
    const USAGE: &str = "shortcuts <on|off> [modifiers] [count]";

    let defaults = ShortcutConfig::default();
    let enabled = match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("on") => true,
        Some("off") => false,
        _ => return Err(CommandError::Usage(USAGE)),
    };
    let modifiers = match args.get(1) {
        Some(text) => text.parse::<ModifierSet>()?,
        None => defaults.modifiers,
    };
    let digit_count = match args.get(2) {
        Some(text) => text.parse().map_err(|_| CommandError::Usage(USAGE))?,
        None => defaults.digit_count,
    };
    if args.len() > 3 {
        return Err(CommandError::Usage(USAGE));
    }

    let config = ShortcutConfig {
        enabled,
        modifiers,
        digit_count,
    };
    config.validate()?;
    Ok(config)
}

/// Pipeline outcomes reach the status line from inside the run, except a
/// worker that died before it could report anything.
fn worker_failure<T>(result: &Result<T, PipelineError>) -> Option<&PipelineError> {
    match result {
        Err(err @ PipelineError::Worker(_)) => Some(err),
        _ => None,
    }
}

fn report_worker_failure<T>(result: &Result<T, PipelineError>) {
    if let Some(err) = worker_failure(result) {
        warn!(error = %err, "pipeline worker failed");
        println!("status: {err}");
    }
}

async fn read_password(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Option<SecretString>> {
    println!("password:");
    Ok(lines.next_line().await?.map(SecretString::new))
}

fn print_history(app: &App) {
    let registry = app.registry();
    if registry.is_empty() {
        println!("(history is empty)");
        return;
    }
    for kind in ContentKind::ALL {
        for entry in registry.all(kind) {
            println!("{}", render_entry(&entry));
        }
    }
}

/// Starts the watcher and hotkeys, then serves commands until `quit` or EOF.
pub async fn run(wired: Wired) -> anyhow::Result<()> {
    let Wired {
        app,
        watcher,
        data_dir,
    } = wired;

    match app.apply_saved_shortcuts().await {
        Ok(count) => info!(count, "hotkeys registered"),
        Err(err) => warn!(error = %format!("{err:#}"), "hotkeys not registered"),
    }
    watcher.start().await?;

    println!("clipstash: data in {}", data_dir.display());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        dispatch(&app, command, &mut lines).await?;
    }

    watcher.stop().await?;
    info!("clipstash exiting");
    Ok(())
}

async fn dispatch(
    app: &Arc<App>,
    command: Command,
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    match command {
        Command::Save { force } => {
            let Some(password) = read_password(lines).await? else {
                return Ok(());
            };
            let options = ExportOptions {
                on_delete_failure: if force {
                    DeleteFailurePolicy::Continue
                } else {
                    DeleteFailurePolicy::Abort
                },
            };
            report_worker_failure(&app.export(password, options).await);
        }
        Command::Load => {
            let Some(password) = read_password(lines).await? else {
                return Ok(());
            };
            report_worker_failure(&app.import(password).await);
        }
        Command::List => print_history(app),
        Command::Urls(index) => match app.urls(index) {
            Ok(urls) if urls.is_empty() => println!("no URLs in text #{index}"),
            Ok(urls) => urls.iter().for_each(|url| println!("{url}")),
            Err(err) => println!("{err}"),
        },
        Command::Shortcuts(config) => {
            if let Err(err) = app.update_shortcuts(config).await {
                println!("{err:#}");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("save"), Ok(Some(Command::Save { force: false })));
        assert_eq!(
            parse_command("SAVE --force"),
            Ok(Some(Command::Save { force: true }))
        );
        assert_eq!(parse_command("load"), Ok(Some(Command::Load)));
        assert_eq!(parse_command("urls 4"), Ok(Some(Command::Urls(4))));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(matches!(parse_command("urls x"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("save now"), Err(CommandError::Usage(_))));
        assert!(matches!(parse_command("paste"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn parses_shortcut_settings() {
        let Ok(Some(Command::Shortcuts(config))) = parse_command("shortcuts on ctrl+shift 3")
        else {
            panic!("expected shortcuts command");
        };
        assert!(config.enabled);
        assert_eq!(config.modifiers.to_string(), "Ctrl+Shift");
        assert_eq!(config.digit_count, 3);

        let Ok(Some(Command::Shortcuts(off))) = parse_command("shortcuts off") else {
            panic!("expected shortcuts command");
        };
        assert!(!off.enabled);
        assert_eq!(off.digit_count, 9);
    }

    #[test]
    fn only_worker_failures_need_reporting() {
        let worker: Result<(), PipelineError> = Err(PipelineError::Worker("panicked".into()));
        assert!(matches!(
            worker_failure(&worker),
            Some(PipelineError::Worker(_))
        ));

        let reported: Result<(), PipelineError> = Err(PipelineError::IncorrectPassword);
        assert!(worker_failure(&reported).is_none());
        assert!(worker_failure(&Ok::<(), PipelineError>(())).is_none());
    }

    #[test]
    fn shortcut_errors_surface() {
        assert!(matches!(
            parse_command("shortcuts on Hyper 3"),
            Err(CommandError::Shortcut(ShortcutConfigError::UnknownModifier(_)))
        ));
        assert!(matches!(
            parse_command("shortcuts on Ctrl 10"),
            Err(CommandError::Shortcut(ShortcutConfigError::CountOutOfRange(10)))
        ));
        assert!(matches!(
            parse_command("shortcuts maybe"),
            Err(CommandError::Usage(_))
        ));
    }
}
