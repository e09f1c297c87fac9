// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Opcode table for the HMMM 16-bit instruction set.
//!
//! The table is the wire contract between the assembler that produces a
//! program image and this simulator: both sides must agree on the bit
//! layout encoded here. A word matches an entry when `word & mask` equals
//! the entry's match pattern. The table is order-dependent and the first
//! match wins; that ordering is what separates the `nop`/`mov` special
//! cases from the general `add` pattern, `neg` from `sub`, and `jump` from
//! `call`. The final `data` entry has an all-zero mask and therefore
//! matches every word that reached it.

pub mod decode;

/// One row of the opcode table.
///
/// `args` describes how the bits after the opcode nibble are consumed, left
/// to right:
///
/// * `r` - register index, 4 bits, unsigned
/// * `z` - 4 bits discarded
/// * `s` - signed 8-bit immediate (two's complement)
/// * `u` - unsigned 8-bit immediate
/// * `n` - unsigned 16-bit immediate; the whole word is the value (`data`)
pub struct OpcodeEntry {
    pub match_pattern: u16,
    pub mask: u16,
    pub mnemonic: &'static str,
    pub args: &'static str,
}

pub static OPCODE_TABLE: &[OpcodeEntry] = &[
    OpcodeEntry {
        match_pattern: 0b0000_0000_0000_0000,
        mask: 0b1111_1111_1111_1111,
        mnemonic: "halt",
        args: "",
    },
    OpcodeEntry {
        match_pattern: 0b0000_0000_0000_0001,
        mask: 0b1111_0000_1111_1111,
        mnemonic: "read",
        args: "r",
    },
    OpcodeEntry {
        match_pattern: 0b0000_0000_0000_0010,
        mask: 0b1111_0000_1111_1111,
        mnemonic: "write",
        args: "r",
    },
    OpcodeEntry {
        match_pattern: 0b0000_0000_0000_0011,
        mask: 0b1111_0000_1111_1111,
        mnemonic: "jumpi",
        args: "r",
    },
    OpcodeEntry {
        match_pattern: 0b0001_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "loadn",
        args: "rs",
    },
    OpcodeEntry {
        match_pattern: 0b0010_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "load",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b0011_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "store",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b0100_0000_0000_0000,
        mask: 0b1111_0000_0000_1111,
        mnemonic: "loadi",
        args: "rr",
    },
    OpcodeEntry {
        match_pattern: 0b0100_0000_0000_0001,
        mask: 0b1111_0000_0000_1111,
        mnemonic: "storei",
        args: "rr",
    },
    OpcodeEntry {
        match_pattern: 0b0101_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "addn",
        args: "rs",
    },
    // nop and mov are masked specializations of the add pattern; they must
    // stay ahead of add in the table.
    OpcodeEntry {
        match_pattern: 0b0110_0000_0000_0000,
        mask: 0b1111_1111_1111_1111,
        mnemonic: "nop",
        args: "",
    },
    OpcodeEntry {
        match_pattern: 0b0110_0000_0000_0000,
        mask: 0b1111_0000_0000_1111,
        mnemonic: "mov",
        args: "rr",
    },
    OpcodeEntry {
        match_pattern: 0b0110_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "add",
        args: "rrr",
    },
    OpcodeEntry {
        match_pattern: 0b0111_0000_0000_0000,
        mask: 0b1111_0000_1111_0000,
        mnemonic: "neg",
        args: "rzr",
    },
    OpcodeEntry {
        match_pattern: 0b0111_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "sub",
        args: "rrr",
    },
    OpcodeEntry {
        match_pattern: 0b1000_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "mul",
        args: "rrr",
    },
    OpcodeEntry {
        match_pattern: 0b1001_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "div",
        args: "rrr",
    },
    OpcodeEntry {
        match_pattern: 0b1010_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "mod",
        args: "rrr",
    },
    OpcodeEntry {
        match_pattern: 0b1011_0000_0000_0000,
        mask: 0b1111_1111_0000_0000,
        mnemonic: "jump",
        args: "zu",
    },
    OpcodeEntry {
        match_pattern: 0b1011_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "call",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b1100_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "jeqz",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b1101_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "jnez",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b1110_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "jgtz",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b1111_0000_0000_0000,
        mask: 0b1111_0000_0000_0000,
        mnemonic: "jltz",
        args: "ru",
    },
    OpcodeEntry {
        match_pattern: 0b0000_0000_0000_0000,
        mask: 0b0000_0000_0000_0000,
        mnemonic: "data",
        args: "n",
    },
];

/// First table entry matching `word`, in table order.
pub fn lookup_word(word: u16) -> Option<&'static OpcodeEntry> {
    OPCODE_TABLE
        .iter()
        .find(|entry| word & entry.mask == entry.match_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_word_matches_some_entry() {
        for word in 0..=u16::MAX {
            assert!(lookup_word(word).is_some(), "no entry for {word:#06x}");
        }
    }

    #[test]
    fn table_order_disambiguates_overlapping_patterns() {
        assert_eq!(lookup_word(0x6000).map(|e| e.mnemonic), Some("nop"));
        assert_eq!(lookup_word(0x6120).map(|e| e.mnemonic), Some("mov"));
        assert_eq!(lookup_word(0x6123).map(|e| e.mnemonic), Some("add"));
        assert_eq!(lookup_word(0x7102).map(|e| e.mnemonic), Some("neg"));
        assert_eq!(lookup_word(0x7123).map(|e| e.mnemonic), Some("sub"));
        assert_eq!(lookup_word(0xB005).map(|e| e.mnemonic), Some("jump"));
        assert_eq!(lookup_word(0xB105).map(|e| e.mnemonic), Some("call"));
    }

    #[test]
    fn unassigned_patterns_fall_through_to_data() {
        assert_eq!(lookup_word(0x0004).map(|e| e.mnemonic), Some("data"));
        assert_eq!(lookup_word(0x0F10).map(|e| e.mnemonic), Some("data"));
    }

    #[test]
    fn shapes_use_known_field_letters_and_fit_one_word() {
        for entry in OPCODE_TABLE {
            let mut bits = 4;
            for shape in entry.args.chars() {
                bits += match shape {
                    'r' | 'z' => 4,
                    's' | 'u' => 8,
                    'n' => 12,
                    other => panic!("unknown shape {other} in {}", entry.mnemonic),
                };
            }
            assert!(bits <= 16, "oversized shape for {}", entry.mnemonic);
        }
    }
}
