// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Machine state and error types for the HMMM execution engine.
//!
//! The whole machine lives in one owned [`Machine`] value that the
//! fetch-execute cycle mutates; there is no ambient global state. Memory is
//! split by `codesize` into the instruction region `[0, codesize)` and the
//! data region `[codesize, 256)`; `codesize` is fixed at load time.

pub mod console;
pub mod exec;

use std::fmt;
use std::io;

pub const MEMORY_SIZE: usize = 256;
pub const REGISTER_COUNT: usize = 16;
pub const WORD_MIN: i32 = -32768;
pub const WORD_MAX: i32 = 32767;

/// Whether `value` fits the signed 16-bit range of a machine word.
pub fn valid_word(value: i32) -> bool {
    (WORD_MIN..=WORD_MAX).contains(&value)
}

/// One memory cell: an instruction word in its textual bit-pattern form, or
/// a data word. Loaded program lines become `Code`; everything the program
/// stores at runtime is `Data`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Word {
    Code(String),
    Data(i32),
}

/// The simulated machine: 256 words of memory, 16 registers, the program
/// counter, and the instruction-region boundary. `lpc` retains the pc at
/// the start of the current cycle for diagnostics.
#[derive(Clone, Debug)]
pub struct Machine {
    pub memory: Vec<Word>,
    pub registers: [i32; REGISTER_COUNT],
    pub pc: i32,
    pub lpc: i32,
    pub codesize: usize,
}

impl Machine {
    /// Build a freshly loaded machine: pc at zero, registers cleared.
    ///
    /// `memory` must hold exactly [`MEMORY_SIZE`] words and `codesize` must
    /// be in `1..=MEMORY_SIZE`; the loader guarantees both.
    pub fn new(memory: Vec<Word>, codesize: usize) -> Self {
        Self {
            memory,
            registers: [0; REGISTER_COUNT],
            pc: 0,
            lpc: 0,
            codesize,
        }
    }
}

/// Fatal simulation failures. Every variant terminates the run; none is
/// recoverable. Invalid `read` input is not an error at this level, it is
/// re-prompted at the console.
#[derive(Debug)]
pub enum SimulationError {
    /// The pc left the instruction region without a jump.
    PcOutOfBounds { pc: i32 },
    /// A fetched cell held runtime data rather than an instruction word.
    BadInstruction { pc: i32 },
    /// The fetched word decoded to something the dispatcher cannot execute.
    InvalidOpcode { pc: i32 },
    InvalidJumpTarget { pc: i32, target: i32 },
    InvalidLoadTarget { pc: i32, target: i32 },
    InvalidStoreTarget { pc: i32, target: i32 },
    /// Arithmetic result outside `[WORD_MIN, WORD_MAX]`; carries the
    /// rendered instruction for the diagnostic.
    Overflow { pc: i32, instruction: String },
    DivisionByZero { pc: i32 },
    /// Console I/O failed underneath a `read` or `write`.
    Io(io::Error),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PcOutOfBounds { pc } => {
                write!(
                    f,
                    "memory out of bounds: program attempted to execute memory location {pc}"
                )
            }
            Self::BadInstruction { pc } => {
                write!(f, "bad instruction at memory location {pc}")
            }
            Self::InvalidOpcode { pc } => write!(f, "invalid operation code at pc {pc}"),
            Self::InvalidJumpTarget { pc, target } => {
                write!(f, "invalid jump target at pc {pc}: {target}")
            }
            Self::InvalidLoadTarget { pc, target } => {
                write!(f, "invalid load target at pc {pc}: {target}")
            }
            Self::InvalidStoreTarget { pc, target } => {
                write!(f, "invalid store target at pc {pc}: {target}")
            }
            Self::Overflow { pc, instruction } => {
                write!(
                    f,
                    "integer overflow at pc {pc} ({instruction}): result does not fit in 16 bits"
                )
            }
            Self::DivisionByZero { pc } => write!(f, "division by zero at pc {pc}"),
            Self::Io(err) => write!(f, "console error: {err}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SimulationError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
