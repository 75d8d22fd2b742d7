//! Thin adapter around the interactive line protocol.
//!
//! The resolver only needs two operations: show a block of text and read a
//! trimmed response line. Keeping this behind a trait lets tests drive the
//! review flow with a scripted transcript instead of a terminal.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented operator console.
pub trait Prompt {
    /// Show a block of text to the operator.
    fn say(&mut self, text: &str) -> io::Result<()>;

    /// Block until one response line is available. EOF on the input stream
    /// is an error; the review protocol has no way to proceed without an
    /// operator.
    fn read_line(&mut self) -> io::Result<String>;
}

/// Operator console over stdin/stdout.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Prompt for ConsolePrompt {
    fn say(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input stream closed while waiting for a decision",
            ));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

/// Scripted console for tests: responses are served in order and everything
/// said is captured in a transcript.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    responses: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// True if every scripted response has been consumed.
    pub fn exhausted(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Prompt for ScriptedPrompt {
    fn say(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<String> {
        self.responses.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "scripted responses exhausted")
        })
    }
}
