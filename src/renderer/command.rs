//! Renderer that shells out to an external markdown converter
//!
//! The markdown is written to the program's stdin and HTML is read back from
//! its stdout. Stderr is captured for diagnostics.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::Renderer;
use crate::renderer::error::{RenderError, RenderResult};

/// Default conversion command (Python-Markdown reads stdin when given no file)
pub const DEFAULT_COMMAND: &str = "python3 -m markdown";

/// Default time the conversion program is allowed to run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external program to convert markdown into HTML
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    /// Create a renderer for `program` invoked with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Parse a whitespace-separated command line such as `pandoc -f gfm`
    ///
    /// No shell quoting is applied, so a program path or argument containing
    /// spaces cannot be expressed; use [`CommandRenderer::new`] instead.
    pub fn from_command_line(line: &str) -> RenderResult<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(RenderError::EmptyCommand)?;
        Ok(Self::new(program, parts.collect()))
    }

    /// Limit how long the program may run
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program that will be executed
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn timed_out(&self) -> RenderError {
        RenderError::Timeout {
            program: self.program.clone(),
            timeout: self.timeout,
        }
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        &self.program
    }

    fn render(&self, markdown: &str) -> RenderResult<String> {
        debug!(program = %self.program, args = ?self.args, "spawning renderer");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Unavailable {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin and drain both output pipes on helper threads so a large
        // document cannot fill a pipe buffer and stall the child. Helpers are
        // never joined: a grandchild may hold a pipe open past the deadline.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "renderer stdin unavailable"))?;
        let input = markdown.to_owned();
        let program = self.program.clone();
        thread::spawn(move || {
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    warn!(program = %program, error = %e, "failed writing to renderer stdin");
                }
            }
        });

        let (tx, rx) = mpsc::channel();
        spawn_reader(Pipe::Stdout, child.stdout.take(), tx.clone());
        spawn_reader(Pipe::Stderr, child.stderr.take(), tx);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.timed_out());
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let mut stdout = None;
        let mut stderr = None;
        while stdout.is_none() || stderr.is_none() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((Pipe::Stdout, output)) => stdout = Some(output?),
                Ok((Pipe::Stderr, output)) => stderr = Some(output?),
                Err(RecvTimeoutError::Timeout) => return Err(self.timed_out()),
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(io::Error::new(
                        io::ErrorKind::Other,
                        "renderer pipe reader stopped",
                    )
                    .into())
                }
            }
        }
        let (stdout, stderr) = (stdout.unwrap_or_default(), stderr.unwrap_or_default());

        if !status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        if !stderr.is_empty() {
            debug!(program = %self.program, stderr = %String::from_utf8_lossy(&stderr), "renderer stderr");
        }

        String::from_utf8(stdout).map_err(|_| RenderError::Decode(self.program.clone()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

fn spawn_reader<R>(which: Pipe, pipe: Option<R>, tx: Sender<(Pipe, io::Result<Vec<u8>>)>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = match pipe {
            Some(mut pipe) => pipe.read_to_end(&mut buf).map(|_| buf),
            None => Ok(buf),
        };
        // The receiver is gone once render has given up on the deadline
        let _ = tx.send((which, result));
    });
}
