// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Fetch-execute cycle and per-mnemonic dispatch.

use crate::isa::decode::{decode_bits, Decoded, DecodedInstruction, UNTRANSLATABLE};
use crate::vm::console::Console;
use crate::vm::{valid_word, Machine, SimulationError, Word, MEMORY_SIZE};

/// Outcome of a single cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// A `halt` instruction retired.
    Halted,
    /// The user quit at a `read` prompt or input reached end of file.
    Quit,
}

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Halted,
    Quit,
}

impl Machine {
    /// Run fetch-execute cycles until the program halts, the user quits, or
    /// a fatal simulation error occurs. With `trace` set, each instruction
    /// is printed to stderr before it executes.
    pub fn run(
        &mut self,
        console: &mut dyn Console,
        trace: bool,
    ) -> Result<RunOutcome, SimulationError> {
        loop {
            if trace && self.pc >= 0 && (self.pc as usize) < self.codesize {
                eprintln!("{:>3}: {}", self.pc, self.disassemble(self.pc as usize));
            }
            match self.step(console)? {
                Step::Continue => {}
                Step::Halted => return Ok(RunOutcome::Halted),
                Step::Quit => return Ok(RunOutcome::Quit),
            }
        }
    }

    /// Execute one cycle: bounds-check the pc, fetch, decode, dispatch.
    /// Register 0 is forced back to zero before and after dispatch.
    pub fn step(&mut self, console: &mut dyn Console) -> Result<Step, SimulationError> {
        if self.pc < 0 || self.pc as usize >= self.codesize {
            return Err(SimulationError::PcOutOfBounds { pc: self.pc });
        }
        self.lpc = self.pc;
        let cell = self.memory[self.pc as usize].clone();
        self.pc += 1;
        self.registers[0] = 0;

        let instr = match &cell {
            Word::Data(_) => return Err(SimulationError::BadInstruction { pc: self.lpc }),
            Word::Code(bits) => match decode_bits(bits) {
                Decoded::Instruction(instr) => instr,
                Decoded::Untranslatable => {
                    return Err(SimulationError::InvalidOpcode { pc: self.lpc })
                }
            },
        };

        let outcome = self.dispatch(&instr, console)?;
        self.registers[0] = 0;
        Ok(outcome)
    }

    /// Rendered assembly for the instruction at `address`, for traces and
    /// listings.
    pub fn disassemble(&self, address: usize) -> String {
        match self.memory.get(address) {
            Some(Word::Code(bits)) => match decode_bits(bits) {
                Decoded::Instruction(instr) => instr.text,
                Decoded::Untranslatable => UNTRANSLATABLE.to_string(),
            },
            _ => UNTRANSLATABLE.to_string(),
        }
    }

    fn dispatch(
        &mut self,
        instr: &DecodedInstruction,
        console: &mut dyn Console,
    ) -> Result<Step, SimulationError> {
        match instr.mnemonic {
            "halt" => return Ok(Step::Halted),

            "read" => {
                let register = instr.args[0] as usize;
                let mut line = match console.prompt("Enter number: ")? {
                    Some(line) => line,
                    None => return Ok(Step::Quit),
                };
                loop {
                    if let Some(value) = parse_read_input(&line) {
                        self.registers[register] = value;
                        break;
                    }
                    console.notice("Illegal input: number must be in [-32768,32767]")?;
                    line = match console.prompt("Enter number (q to quit): ")? {
                        Some(line) => line,
                        None => return Ok(Step::Quit),
                    };
                    if line.trim() == "q" {
                        return Ok(Step::Quit);
                    }
                }
            }

            "write" => console.write_int(self.registers[instr.args[0] as usize])?,

            "jumpi" => {
                self.pc = self.registers[instr.args[0] as usize];
                self.check_jump_target()?;
            }

            "loadn" => self.registers[instr.args[0] as usize] = instr.args[1],

            "load" => {
                let address = self.data_address(instr.args[1]).ok_or_else(|| {
                    SimulationError::InvalidLoadTarget {
                        pc: self.lpc,
                        target: instr.args[1],
                    }
                })?;
                self.registers[instr.args[0] as usize] = self.read_data(address);
            }

            "store" => {
                let address = self.data_address(instr.args[1]).ok_or_else(|| {
                    SimulationError::InvalidStoreTarget {
                        pc: self.lpc,
                        target: instr.args[1],
                    }
                })?;
                self.memory[address] = Word::Data(self.registers[instr.args[0] as usize]);
            }

            "loadi" => {
                let target = self.registers[instr.args[1] as usize];
                let address = self.data_address(target).ok_or_else(|| {
                    SimulationError::InvalidLoadTarget {
                        pc: self.lpc,
                        target,
                    }
                })?;
                self.registers[instr.args[0] as usize] = self.read_data(address);
            }

            "storei" => {
                let target = self.registers[instr.args[1] as usize];
                let address = self.data_address(target).ok_or_else(|| {
                    SimulationError::InvalidStoreTarget {
                        pc: self.lpc,
                        target,
                    }
                })?;
                self.memory[address] = Word::Data(self.registers[instr.args[0] as usize]);
            }

            "addn" => {
                let register = instr.args[0] as usize;
                self.registers[register] += instr.args[1];
                self.check_overflow(register, instr)?;
            }

            // mov and nop are add with implicit zero operands; register 0
            // supplies the zeros.
            "add" | "mov" | "nop" => {
                let (rx, ry, rz) = match instr.mnemonic {
                    "nop" => (0, 0, 0),
                    "mov" => (instr.args[0] as usize, instr.args[1] as usize, 0),
                    _ => (
                        instr.args[0] as usize,
                        instr.args[1] as usize,
                        instr.args[2] as usize,
                    ),
                };
                self.registers[rx] = self.registers[ry] + self.registers[rz];
                self.check_overflow(rx, instr)?;
            }

            // neg subtracts its operand from register 0.
            "sub" | "neg" => {
                let (rx, ry, rz) = match instr.mnemonic {
                    "neg" => (instr.args[0] as usize, 0, instr.args[1] as usize),
                    _ => (
                        instr.args[0] as usize,
                        instr.args[1] as usize,
                        instr.args[2] as usize,
                    ),
                };
                self.registers[rx] = self.registers[ry] - self.registers[rz];
                self.check_overflow(rx, instr)?;
            }

            "mul" => {
                let register = instr.args[0] as usize;
                self.registers[register] =
                    self.registers[instr.args[1] as usize] * self.registers[instr.args[2] as usize];
                self.check_overflow(register, instr)?;
            }

            "div" | "mod" => {
                let divisor = self.registers[instr.args[2] as usize];
                if divisor == 0 {
                    return Err(SimulationError::DivisionByZero { pc: self.lpc });
                }
                let dividend = self.registers[instr.args[1] as usize];
                self.registers[instr.args[0] as usize] = if instr.mnemonic == "div" {
                    floor_div(dividend, divisor)
                } else {
                    floor_mod(dividend, divisor)
                };
            }

            // jump stores the return pc into register 0, where it vanishes.
            "jump" | "call" => {
                let (register, target) = if instr.mnemonic == "jump" {
                    (0, instr.args[0])
                } else {
                    (instr.args[0] as usize, instr.args[1])
                };
                self.registers[register] = self.pc;
                self.pc = target;
                self.check_jump_target()?;
            }

            "jeqz" | "jnez" | "jgtz" | "jltz" => {
                let target = instr.args[1];
                // The target is validated even when the branch is not taken.
                if target < 0 || target as usize >= self.codesize {
                    return Err(SimulationError::InvalidJumpTarget {
                        pc: self.lpc,
                        target,
                    });
                }
                let value = self.registers[instr.args[0] as usize];
                let taken = match instr.mnemonic {
                    "jeqz" => value == 0,
                    "jnez" => value != 0,
                    "jgtz" => value > 0,
                    _ => value < 0,
                };
                if taken {
                    self.pc = target;
                }
            }

            _ => return Err(SimulationError::InvalidOpcode { pc: self.lpc }),
        }
        Ok(Step::Continue)
    }

    /// Resolve `target` as a data-region address, `[codesize, 256)`.
    fn data_address(&self, target: i32) -> Option<usize> {
        let address = usize::try_from(target).ok()?;
        (self.codesize..MEMORY_SIZE)
            .contains(&address)
            .then_some(address)
    }

    fn read_data(&self, address: usize) -> i32 {
        match &self.memory[address] {
            Word::Data(value) => *value,
            // The data region only ever holds Data cells.
            Word::Code(_) => 0,
        }
    }

    fn check_jump_target(&self) -> Result<(), SimulationError> {
        if self.pc < 0 || self.pc as usize >= self.codesize {
            return Err(SimulationError::InvalidJumpTarget {
                pc: self.lpc,
                target: self.pc,
            });
        }
        Ok(())
    }

    fn check_overflow(
        &self,
        register: usize,
        instr: &DecodedInstruction,
    ) -> Result<(), SimulationError> {
        if !valid_word(self.registers[register]) {
            return Err(SimulationError::Overflow {
                pc: self.lpc,
                instruction: instr.text.clone(),
            });
        }
        Ok(())
    }
}

/// A valid `read` input: a signed decimal within the machine word range.
fn parse_read_input(line: &str) -> Option<i32> {
    let value: i32 = line.trim().parse().ok()?;
    valid_word(value).then_some(value)
}

/// Quotient rounded toward negative infinity; `div` is a floor division.
/// Callers reject a zero divisor first.
fn floor_div(dividend: i32, divisor: i32) -> i32 {
    let quotient = dividend / divisor;
    if dividend % divisor != 0 && (dividend < 0) != (divisor < 0) {
        quotient - 1
    } else {
        quotient
    }
}

/// Remainder consistent with [`floor_div`]: takes the sign of the divisor.
fn floor_mod(dividend: i32, divisor: i32) -> i32 {
    dividend - divisor * floor_div(dividend, divisor)
}
