// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for the HMMM simulator.

use clap::Parser;
use serde_json::json;

use hmmmsim::cli::{Cli, OutputFormat};
use hmmmsim::loader::load_program;
use hmmmsim::vm::console::StdConsole;
use hmmmsim::vm::exec::RunOutcome;
use hmmmsim::vm::{Machine, Word};

fn main() {
    let cli = Cli::parse();

    let mut machine = match load_program(&cli.input) {
        Ok(machine) => machine,
        Err(err) => {
            report_error(cli.format, &cli.input.display().to_string(), &err.to_string());
            std::process::exit(1);
        }
    };

    if cli.list {
        print_listing(&machine, cli.format);
        return;
    }

    let mut console = StdConsole::new();
    match machine.run(&mut console, cli.trace) {
        Ok(RunOutcome::Halted) => {}
        Ok(RunOutcome::Quit) => {
            eprintln!("\nEnd of input, halting program execution.");
        }
        Err(err) => {
            report_error(cli.format, &cli.input.display().to_string(), &err.to_string());
            eprintln!("Halting program execution.");
            std::process::exit(1);
        }
    }
}

fn report_error(format: OutputFormat, file: &str, message: &str) {
    match format {
        OutputFormat::Text => eprintln!("{file}: error: {message}"),
        OutputFormat::Json => eprintln!(
            "{}",
            json!({
                "severity": "error",
                "file": file,
                "message": message,
            })
        ),
    }
}

fn print_listing(machine: &Machine, format: OutputFormat) {
    for address in 0..machine.codesize {
        let bits = match &machine.memory[address] {
            Word::Code(bits) => nibble_grouped(bits),
            Word::Data(_) => continue,
        };
        let text = machine.disassemble(address);
        match format {
            OutputFormat::Text => println!("{address:>3}  {bits}  {text}"),
            OutputFormat::Json => println!(
                "{}",
                json!({
                    "address": address,
                    "bits": bits,
                    "text": text,
                })
            ),
        }
    }
}

/// Regroup a bit pattern into space-separated nibbles for display.
fn nibble_grouped(bits: &str) -> String {
    let cleaned: Vec<char> = bits.chars().filter(|c| *c == '0' || *c == '1').collect();
    cleaned
        .chunks(4)
        .map(|nibble| nibble.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
