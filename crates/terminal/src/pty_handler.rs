//! Child process in a pseudo-terminal.

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

const TERM_NAME: &str = "xterm-256color";

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error(transparent)]
    Syntax(#[from] shell_words::ParseError),
    #[error("empty command")]
    Empty,
}

/// What to run in the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildCommand {
    /// The user's login shell: `$SHELL`, else the passwd entry, else `/bin/sh`.
    LoginShell,
    /// An explicit argv, e.g. from `--exec`.
    Argv(Vec<String>),
}

impl ChildCommand {
    /// Split an `--exec` string with POSIX shell quoting rules. A string
    /// with no words is an error, not a request for the login shell.
    pub fn from_exec(command: &str) -> Result<Self, CommandParseError> {
        let argv = shell_words::split(command)?;
        if argv.is_empty() {
            return Err(CommandParseError::Empty);
        }
        Ok(Self::Argv(argv))
    }

    fn builder(&self) -> CommandBuilder {
        match self {
            ChildCommand::LoginShell => CommandBuilder::new_default_prog(),
            ChildCommand::Argv(argv) => CommandBuilder::from_argv(argv.iter().map(Into::into).collect()),
        }
    }
}

/// A spawned child and the master side of its PTY.
///
/// Output is read on a background thread and handed out once through
/// [`take_output`](Self::take_output). Dropping the handler kills the child.
pub struct PtyHandler {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    output_rx: Option<Receiver<Vec<u8>>>,
    exited: Arc<AtomicBool>,
    child: Box<dyn Child + Send + Sync>,
    _reader_thread: thread::JoinHandle<()>,
}

impl PtyHandler {
    pub fn spawn(
        command: &ChildCommand,
        working_dir: Option<PathBuf>,
        rows: u16,
        cols: u16,
    ) -> Result<Self> {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("failed to open PTY")?;

        let mut cmd = command.builder();
        cmd.env("TERM", TERM_NAME);
        cmd.env("COLORTERM", "truecolor");
        if let Some(dir) = working_dir {
            cmd.cwd(dir);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .with_context(|| format!("failed to spawn {command:?}"))?;
        // The slave must be closed on our side or EOF never arrives.
        drop(pair.slave);

        let writer = pair
            .master
            .take_writer()
            .context("failed to get PTY writer")?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .context("failed to get PTY reader")?;

        let (output_tx, output_rx) = mpsc::channel();
        let exited = Arc::new(AtomicBool::new(false));
        let exited_clone = exited.clone();

        let reader_thread = thread::Builder::new()
            .name("termise-pty-reader".into())
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) | Err(_) => {
                            exited_clone.store(true, Ordering::SeqCst);
                            break;
                        }
                        Ok(n) => {
                            if output_tx.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                    }
                }
            })
            .context("failed to start PTY reader thread")?;

        Ok(Self {
            master: pair.master,
            writer,
            output_rx: Some(output_rx),
            exited,
            child,
            _reader_thread: reader_thread,
        })
    }

    /// The output channel. Only the first call returns it.
    pub fn take_output(&mut self) -> Option<Receiver<Vec<u8>>> {
        self.output_rx.take()
    }

    /// Flag set by the reader thread once the PTY hits EOF.
    pub fn exited_flag(&self) -> Arc<AtomicBool> {
        self.exited.clone()
    }

    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    /// Exit code of the child once it has been reaped. Killed children report 1.
    pub fn exit_code(&mut self) -> Option<i32> {
        match self.child.try_wait() {
            Ok(Some(status)) => Some(i32::try_from(status.exit_code()).unwrap_or(1)),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "failed to poll child status");
                Some(1)
            }
        }
    }

    pub fn resize(&self, rows: u16, cols: u16) -> Result<()> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("failed to resize PTY")
    }
}

impl Drop for PtyHandler {
    fn drop(&mut self) {
        if let Err(error) = self.child.kill() {
            tracing::debug!(%error, "child already gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn exec_strings_use_shell_quoting() {
        assert_eq!(
            ChildCommand::from_exec("vim 'my file.txt'").unwrap(),
            ChildCommand::Argv(vec!["vim".into(), "my file.txt".into()])
        );
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        assert!(matches!(
            ChildCommand::from_exec("echo 'oops"),
            Err(CommandParseError::Syntax(_))
        ));
    }

    #[test]
    fn empty_or_blank_exec_is_rejected() {
        for command in ["", "   ", "\t\n"] {
            assert!(
                matches!(ChildCommand::from_exec(command), Err(CommandParseError::Empty)),
                "{command:?}"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn spawned_child_output_and_exit_code() {
        let command = ChildCommand::Argv(vec!["sh".into(), "-c".into(), "printf hi; exit 3".into()]);
        let mut pty = PtyHandler::spawn(&command, None, 24, 80).unwrap();
        let output = pty.take_output().unwrap();
        assert!(pty.take_output().is_none());

        let mut collected = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Ok(chunk) = output.recv_timeout(Duration::from_millis(50)) {
                collected.extend(chunk);
            }
            if collected.ends_with(b"hi") {
                break;
            }
        }
        assert!(String::from_utf8_lossy(&collected).contains("hi"));

        let code = loop {
            if let Some(code) = pty.exit_code() {
                break code;
            }
            assert!(Instant::now() < deadline, "child did not exit");
            std::thread::sleep(Duration::from_millis(10));
        };
        assert_eq!(code, 3);
    }
}
