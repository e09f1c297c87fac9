// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Simulator for the HMMM (Harvey Mudd Miniature Machine) instruction set.

Takes a binary program image produced by the HMMM assembler and runs it:
the `read` instruction prompts on stdin, `write` prints to stdout, and any
invariant violation stops the run with a diagnostic. Use -l/--list to see
the decoded program without running it.";

#[derive(Parser, Debug)]
#[command(
    name = "hmmmsim",
    version = VERSION,
    about = "HMMM 16-bit virtual machine simulator",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// Program image produced by the HMMM assembler.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select diagnostic and listing output format. text is default; json emits one machine-readable object per line."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'l',
        long = "list",
        action = ArgAction::SetTrue,
        long_help = "Print a decoded listing of the loaded program (address, bit pattern, instruction) and exit without running it."
    )]
    pub list: bool,
    #[arg(
        long = "trace",
        action = ArgAction::SetTrue,
        conflicts_with = "list",
        long_help = "Print each instruction to stderr as it is executed."
    )]
    pub trace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
