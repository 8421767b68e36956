//! Line commands driving the runtime.

use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// One user interaction, parsed from a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `click <id>`
    Click(String),
    /// `outside`: click outside every element
    Outside,
    /// `change <id> <value>`
    Change { id: String, value: String },
    /// `attr <host-id> <name> [value]`; no value removes the attribute
    Attr {
        id: String,
        name: String,
        value: Option<String>,
    },
    /// `show`: print the full tree, hidden elements included
    Show,
    /// `quit`
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;

        match name {
            "click" => {
                let id = words.next().ok_or(CommandError::Usage("click <id>"))?;
                Ok(Command::Click(id.to_string()))
            }
            "outside" => Ok(Command::Outside),
            "change" => {
                let usage = CommandError::Usage("change <id> <value>");
                let id = words.next().ok_or_else(|| usage.clone())?;
                let value = words.next().ok_or(usage)?;
                Ok(Command::Change {
                    id: id.to_string(),
                    value: value.to_string(),
                })
            }
            "attr" => {
                let usage = CommandError::Usage("attr <host-id> <name> [value]");
                let id = words.next().ok_or_else(|| usage.clone())?;
                let name = words.next().ok_or(usage)?;
                // The value is the rest of the line, so JSON lists may contain spaces.
                let rest: Vec<&str> = words.collect();
                let value = (!rest.is_empty()).then(|| rest.join(" "));
                Ok(Command::Attr {
                    id: id.to_string(),
                    name: name.to_string(),
                    value,
                })
            }
            "show" => Ok(Command::Show),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Read commands line by line and forward them until input ends or the
/// runtime stops listening. Blank lines are skipped; invalid lines are
/// logged and skipped.
pub async fn read_commands<R>(reader: R, tx: mpsc::Sender<Command>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                log::warn!("read_commands: {}", e);
                eprintln!("{e}");
            }
        }
    }
    Ok(())
}
