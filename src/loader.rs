// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Program image loading and validation.
//!
//! An image is the assembler's output: one 16-bit word per line, written as
//! `0`/`1` characters with optional cosmetic spaces. A blank line ends the
//! image. Everything is validated here, before any instruction runs.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::vm::{Machine, Word, MEMORY_SIZE};

/// Rejections raised while loading a program image.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    /// A character other than `0`, `1`, or space.
    ForeignCharacter { line: usize, character: char },
    /// A line whose significant bits do not total sixteen.
    WrongWidth { line: usize, bits: usize },
    /// No instruction lines before the terminating blank line.
    EmptyProgram,
    /// More instruction lines than the machine has memory words.
    ProgramTooLarge,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read program file: {err}"),
            Self::ForeignCharacter { line, character } => {
                write!(
                    f,
                    "not a valid binary file: unexpected character {character:?} on line {line}"
                )
            }
            Self::WrongWidth { line, bits } => {
                write!(f, "line {line} holds {bits} bits, expected 16")
            }
            Self::EmptyProgram => write!(f, "empty program file"),
            Self::ProgramTooLarge => {
                write!(f, "program exceeds the {MEMORY_SIZE}-word memory")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Read and parse a program image, producing a machine ready to run.
pub fn load_program(path: &Path) -> Result<Machine, LoadError> {
    let text = fs::read_to_string(path).map_err(LoadError::Io)?;
    parse_program(&text)
}

/// Parse program image text. Instruction words fill memory from address
/// zero; the remainder stays zeroed data, and `codesize` marks the split.
pub fn parse_program(text: &str) -> Result<Machine, LoadError> {
    let mut memory = vec![Word::Data(0); MEMORY_SIZE];
    let mut codesize = 0usize;
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(character) = line.chars().find(|c| !matches!(c, '0' | '1' | ' ')) {
            return Err(LoadError::ForeignCharacter {
                line: index + 1,
                character,
            });
        }
        let bits = line.chars().filter(|c| *c == '0' || *c == '1').count();
        if bits != 16 {
            return Err(LoadError::WrongWidth {
                line: index + 1,
                bits,
            });
        }
        if codesize == MEMORY_SIZE {
            return Err(LoadError::ProgramTooLarge);
        }
        memory[codesize] = Word::Code(line.to_string());
        codesize += 1;
    }
    if codesize == 0 {
        return Err(LoadError::EmptyProgram);
    }
    Ok(Machine::new(memory, codesize))
}
