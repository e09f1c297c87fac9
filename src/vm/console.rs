// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Console seam between the execution engine and the outside world.
//!
//! The `read` opcode is the only place the engine blocks; routing it
//! through a trait keeps the engine testable and lets embedders run
//! programs against a scripted input stream instead of a terminal.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// The engine's view of standard input/output.
pub trait Console {
    /// Show `prompt` and read one line of input. `None` signals end of
    /// input, which the engine treats as an unconditional quit.
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Tell the user their last input was rejected.
    fn notice(&mut self, message: &str) -> io::Result<()>;

    /// Emit one integer of program output on its own line.
    fn write_int(&mut self, value: i32) -> io::Result<()>;
}

/// Interactive console over process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{message}")?;
        stdout.flush()
    }

    fn write_int(&mut self, value: i32) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(stdout, "{value}")?;
        stdout.flush()
    }
}

/// Console fed from a fixed script, collecting everything the program
/// writes. Exhausting the script behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    pub outputs: Vec<i32>,
    pub notices: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            outputs: Vec::new(),
            notices: Vec::new(),
        }
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        Ok(self.inputs.pop_front())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }

    fn write_int(&mut self, value: i32) -> io::Result<()> {
        self.outputs.push(value);
        Ok(())
    }
}
