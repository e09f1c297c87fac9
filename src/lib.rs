// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Simulator for the HMMM 16-bit pedagogical instruction set.
//!
//! The crate decodes assembled program images and runs them through a
//! fetch-execute loop over 256 words of memory and 16 registers. See
//! [`loader`] for the image format, [`isa`] for the opcode table, and
//! [`vm`] for the execution engine.

pub mod binary;
pub mod cli;
pub mod isa;
pub mod loader;
pub mod vm;
