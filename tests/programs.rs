// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! End-to-end runs of small HMMM programs through the loader and engine.

use hmmmsim::binary::int_to_twos_complement;
use hmmmsim::loader::parse_program;
use hmmmsim::vm::console::ScriptedConsole;
use hmmmsim::vm::exec::RunOutcome;
use hmmmsim::vm::{Machine, SimulationError};

/// Render instruction words the way the assembler writes them.
fn image(words: &[u16]) -> String {
    words
        .iter()
        .map(|word| int_to_twos_complement(i32::from(*word), 16) + "\n")
        .collect()
}

fn load(words: &[u16]) -> Machine {
    parse_program(&image(words)).expect("test image should load")
}

#[test]
fn echo_program_reads_and_writes_one_number() {
    // read r1 / write r1 / halt
    let mut machine = load(&[0x0101, 0x0102, 0x0000]);
    let mut console = ScriptedConsole::new(["42"]);
    let outcome = machine
        .run(&mut console, false)
        .expect("program should halt");
    assert_eq!(outcome, RunOutcome::Halted);
    assert_eq!(console.outputs, vec![42]);
}

#[test]
fn countdown_loop_writes_descending_values() {
    // loadn r1, 3 / write r1 / addn r1, -1 / jgtz r1, 1 / halt
    let mut machine = load(&[0x1103, 0x0102, 0x51FF, 0xE101, 0x0000]);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let outcome = machine
        .run(&mut console, false)
        .expect("program should halt");
    assert_eq!(outcome, RunOutcome::Halted);
    assert_eq!(console.outputs, vec![3, 2, 1]);
}

#[test]
fn reaching_past_the_word_maximum_is_an_overflow_failure() {
    // Build 32767 in r1 (90 + 91 = 181, squared = 32761, + 6), then push
    // one past it.
    // loadn r1, 90 / addn r1, 91 / mul r1, r1, r1 / addn r1, 6 / addn r1, 1
    let mut machine = load(&[0x115A, 0x515B, 0x8111, 0x5106, 0x5101]);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let err = machine
        .run(&mut console, false)
        .expect_err("the final addn must overflow");
    match err {
        SimulationError::Overflow { pc, instruction } => {
            assert_eq!(pc, 4);
            assert_eq!(instruction, "addn r1, 1");
        }
        other => panic!("expected overflow, got {other}"),
    }
    assert_eq!(machine.registers[1], 32768, "result before the check");
}

#[test]
fn division_by_zero_reports_the_failing_cycle() {
    // loadn r1, 5 / div r3, r1, r2 / halt
    let mut machine = load(&[0x1105, 0x9312, 0x0000]);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let err = machine
        .run(&mut console, false)
        .expect_err("divide by zero must be fatal");
    assert!(matches!(err, SimulationError::DivisionByZero { pc: 1 }));
    assert_eq!(machine.registers[3], 0, "destination untouched");
}

#[test]
fn loading_from_the_instruction_region_is_rejected() {
    // load r1, 5 with six nops behind it so address 5 is still code.
    let mut machine = load(&[0x2105, 0x6000, 0x6000, 0x6000, 0x6000, 0x6000, 0x0000]);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let err = machine
        .run(&mut console, false)
        .expect_err("instruction-region load must fail");
    assert!(matches!(
        err,
        SimulationError::InvalidLoadTarget { pc: 0, target: 5 }
    ));
}

#[test]
fn untaken_conditional_with_bad_target_still_fails() {
    // loadn r1, 1 / jeqz r1, 200 / halt: r1 is nonzero, branch untaken.
    let mut machine = load(&[0x1101, 0xC1C8, 0x0000]);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let err = machine
        .run(&mut console, false)
        .expect_err("target must be validated even untaken");
    assert!(matches!(
        err,
        SimulationError::InvalidJumpTarget { pc: 1, target: 200 }
    ));
}

#[test]
fn quitting_at_the_read_prompt_ends_the_run_cleanly() {
    // read r1 / write r1 / halt
    let mut machine = load(&[0x0101, 0x0102, 0x0000]);
    let mut console = ScriptedConsole::new(["32768", "q"]);
    let outcome = machine
        .run(&mut console, false)
        .expect("quit is not an error");
    assert_eq!(outcome, RunOutcome::Quit);
    assert!(console.outputs.is_empty());
    assert_eq!(
        console.notices,
        vec!["Illegal input: number must be in [-32768,32767]".to_string()]
    );
}

#[test]
fn call_and_jumpi_drive_a_subroutine_round_trip() {
    // call r14, 3 / write r1 / halt / loadn r1, 7 / jumpi r14
    let mut machine = load(&[0xBE03, 0x0102, 0x0000, 0x1107, 0x0E03]);
    let mut console = ScriptedConsole::new(Vec::<String>::new());
    let outcome = machine
        .run(&mut console, false)
        .expect("program should halt");
    assert_eq!(outcome, RunOutcome::Halted);
    assert_eq!(console.outputs, vec![7]);
}
