//! Runtime: feeds commands into the document and prints what changed.
//!
//! The loop waits on two sources:
//! 1. Commands (clicks, changes, attribute writes)
//! 2. Wakeups from state changes made outside a command, e.g. by a
//!    spawned task
//!
//! After either, the document is re-rendered and the visible view is
//! printed if it differs from the last one printed.

mod input;

use std::io::Write;

use shadowdom::{Document, RenderOptions};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::wakeup;

pub use input::{read_commands, Command, CommandError};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Drives a mounted [`Document`].
pub struct Runtime {
    document: Document,
    last_view: Option<String>,
}

impl Runtime {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            last_view: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Run until `commands` closes or a `quit` command arrives, then unmount
    /// the document.
    pub async fn run<W: Write>(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut out: W,
    ) -> Result<(), RuntimeError> {
        let (tx, mut rx) = wakeup::channel();
        wakeup::install_sender(tx);

        let result = self.event_loop(&mut commands, &mut rx, &mut out).await;

        wakeup::uninstall_sender();
        self.document.unmount();
        log::debug!("Runtime::run exited");
        result
    }

    async fn event_loop<W: Write>(
        &mut self,
        commands: &mut mpsc::Receiver<Command>,
        wakeups: &mut wakeup::WakeupReceiver,
        out: &mut W,
    ) -> Result<(), RuntimeError> {
        self.render(out)?;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    if command == Command::Quit {
                        break;
                    }
                    self.apply(command, out)?;
                }
                Some(()) = wakeups.recv() => {
                    log::debug!("Runtime: wakeup");
                }
            }

            // Everything queued so far is covered by the render below.
            wakeups.drain();
            self.render(out)?;
        }

        Ok(())
    }

    /// Apply one command to the document.
    pub fn apply<W: Write>(&mut self, command: Command, out: &mut W) -> Result<(), RuntimeError> {
        log::debug!("Runtime::apply {:?}", command);

        let result = match command {
            Command::Click(id) => self.document.click(&id).map(|_| ()),
            Command::Outside => {
                self.document.click_outside();
                Ok(())
            }
            Command::Change { id, value } => self.document.change(&id, &value).map(|_| ()),
            Command::Attr { id, name, value } => {
                self.document.set_attribute(&id, &name, value.as_deref())
            }
            Command::Show => {
                self.document.update();
                if let Some(markup) = self.document.markup(&RenderOptions::full()) {
                    write!(out, "{markup}")?;
                }
                Ok(())
            }
            Command::Quit => Ok(()),
        };

        if let Err(e) = result {
            log::warn!("Runtime::apply failed: {}", e);
            writeln!(out, "error: {e}")?;
        }
        Ok(())
    }

    /// Re-render the document and print the visible view if it changed.
    pub fn render<W: Write>(&mut self, out: &mut W) -> Result<(), RuntimeError> {
        self.document.update();
        let view = self
            .document
            .markup(&RenderOptions::visible())
            .unwrap_or_default();

        if self.last_view.as_deref() != Some(view.as_str()) {
            write!(out, "{view}")?;
            writeln!(out, "--")?;
            out.flush()?;
            self.last_view = Some(view);
        }
        Ok(())
    }
}
