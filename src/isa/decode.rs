// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Decoder from 16-bit instruction words to mnemonics and typed arguments.

use crate::binary::bit_string_to_int;
use crate::isa::lookup_word;

/// Rendered form of anything the decoder cannot translate.
pub const UNTRANSLATABLE: &str = "***UNTRANSLATABLE INSTRUCTION!***";

/// Result of decoding one memory word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Instruction(DecodedInstruction),
    Untranslatable,
}

/// A decoded instruction: the rendered assembly text, the mnemonic from the
/// opcode table, and the argument values in shape order. Produced per fetch
/// and discarded after dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub text: String,
    pub mnemonic: &'static str,
    pub args: Vec<i32>,
}

/// Decode a textual bit pattern into a mnemonic and argument list.
///
/// Spaces in `bits` are cosmetic and ignored. Anything that is not exactly
/// sixteen significant bits of `0`/`1` decodes to [`Decoded::Untranslatable`]
/// rather than an error; callers treat that the same as an unknown opcode.
pub fn decode_bits(bits: &str) -> Decoded {
    let cleaned: String = bits.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() != 16 || cleaned.chars().any(|c| c != '0' && c != '1') {
        return Decoded::Untranslatable;
    }
    let word = bit_string_to_int(&cleaned) as u16;
    let Some(entry) = lookup_word(word) else {
        return Decoded::Untranslatable;
    };

    // Skip past the opcode nibble, then consume fields left to right,
    // shifting the working word by each field's width.
    let mut working = u32::from(word) << 4;
    let mut text = String::from(entry.mnemonic);
    let mut args = Vec::new();
    let mut separator = " ";
    for shape in entry.args.chars() {
        match shape {
            'r' => {
                let value = ((working & 0xF000) >> 12) as i32;
                text.push_str(separator);
                text.push('r');
                text.push_str(&value.to_string());
                separator = ", ";
                working <<= 4;
                args.push(value);
            }
            'z' => {
                working <<= 4;
            }
            's' | 'u' => {
                let mut value = ((working & 0xFF00) >> 8) as i32;
                if shape == 's' && value & 0x80 != 0 {
                    value -= 256;
                }
                text.push_str(separator);
                text.push_str(&value.to_string());
                separator = ", ";
                working <<= 8;
                args.push(value);
            }
            'n' => {
                // The data pseudo-opcode's value is the whole word, opcode
                // nibble included.
                let value = i32::from(word);
                text.push_str(separator);
                text.push_str(&value.to_string());
                separator = ", ";
                args.push(value);
            }
            _ => return Decoded::Untranslatable,
        }
    }
    Decoded::Instruction(DecodedInstruction {
        text,
        mnemonic: entry.mnemonic,
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_word(word: u16) -> DecodedInstruction {
        match decode_bits(&format!("{word:016b}")) {
            Decoded::Instruction(instr) => instr,
            Decoded::Untranslatable => panic!("{word:#06x} should decode"),
        }
    }

    #[test]
    fn decodes_three_register_instruction() {
        let instr = decode_word(0x6123);
        assert_eq!(instr.mnemonic, "add");
        assert_eq!(instr.args, vec![1, 2, 3]);
        assert_eq!(instr.text, "add r1, r2, r3");
    }

    #[test]
    fn decodes_signed_immediate_as_twos_complement() {
        let instr = decode_word(0x11FF);
        assert_eq!(instr.mnemonic, "loadn");
        assert_eq!(instr.args, vec![1, -1]);
        assert_eq!(instr.text, "loadn r1, -1");

        let instr = decode_word(0x517F);
        assert_eq!(instr.mnemonic, "addn");
        assert_eq!(instr.args, vec![1, 127]);
    }

    #[test]
    fn decodes_unsigned_immediate_without_sign_extension() {
        let instr = decode_word(0x21FF);
        assert_eq!(instr.mnemonic, "load");
        assert_eq!(instr.args, vec![1, 255]);
    }

    #[test]
    fn jump_discards_register_nibble() {
        let instr = decode_word(0xB00A);
        assert_eq!(instr.mnemonic, "jump");
        assert_eq!(instr.args, vec![10]);
        assert_eq!(instr.text, "jump 10");
    }

    #[test]
    fn neg_discards_middle_nibble() {
        let instr = decode_word(0x7102);
        assert_eq!(instr.mnemonic, "neg");
        assert_eq!(instr.args, vec![1, 2]);
        assert_eq!(instr.text, "neg r1, r2");
    }

    #[test]
    fn unassigned_word_decodes_as_data_with_full_value() {
        let instr = decode_word(0x0005);
        assert_eq!(instr.mnemonic, "data");
        assert_eq!(instr.args, vec![5]);
        assert_eq!(instr.text, "data 5");
    }

    #[test]
    fn spaces_in_the_pattern_are_cosmetic() {
        let grouped = decode_bits("0110 0001 0010 0011");
        let packed = decode_bits("0110000100100011");
        assert_eq!(grouped, packed);
    }

    #[test]
    fn malformed_input_is_untranslatable_not_a_panic() {
        assert_eq!(decode_bits(""), Decoded::Untranslatable);
        assert_eq!(decode_bits("01x0000000000000"), Decoded::Untranslatable);
        assert_eq!(decode_bits("0101"), Decoded::Untranslatable);
        assert_eq!(decode_bits("01100001001000111"), Decoded::Untranslatable);
    }

    #[test]
    fn decoding_is_deterministic_for_overlapping_masks() {
        // 0x6000 satisfies the nop, mov, and add patterns; table order must
        // always resolve it to nop.
        for _ in 0..4 {
            let instr = decode_word(0x6000);
            assert_eq!(instr.mnemonic, "nop");
            assert_eq!(instr.text, "nop");
            assert!(instr.args.is_empty());
        }
    }
}
