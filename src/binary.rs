// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Two's-complement codec over binary string representations.
//!
//! Program images store each word as the textual bit pattern read from the
//! file, so the decoder needs conversions between those strings and
//! integers. Addition is performed digit by digit over the strings, which
//! keeps the codec width-agnostic; the simulator only asks for 8 and 16.

/// Encode `value` as a two's-complement bit string of `width` bits.
///
/// Non-negative values are zero-extended by adding their binary form onto an
/// all-zero string of `width` bits. Negative values encode the absolute
/// value the same way, complement it, and add one. `width` must be wide
/// enough to hold the value.
pub fn int_to_twos_complement(value: i32, width: usize) -> String {
    let zeros = "0".repeat(width);
    if value >= 0 {
        add_binary(&zeros, &num_to_bin(value as u32))
    } else {
        let magnitude = add_binary(&zeros, &num_to_bin(value.unsigned_abs()));
        add_binary(&complement(&magnitude), "1")
    }
}

/// Interpret `bits` as an unsigned binary number, most significant bit
/// first. The empty string decodes to zero.
pub fn bit_string_to_int(bits: &str) -> u32 {
    bits.chars()
        .fold(0, |acc, bit| acc * 2 + u32::from(bit == '1'))
}

/// Binary form of `value` without leading zeros; zero encodes as the empty
/// string, matching what the padding addition in the encoder expects.
fn num_to_bin(mut value: u32) -> String {
    let mut bits = Vec::new();
    while value != 0 {
        bits.push(if value % 2 == 1 { '1' } else { '0' });
        value /= 2;
    }
    bits.into_iter().rev().collect()
}

/// Ripple-carry addition over bit strings of possibly unequal length. The
/// shorter operand is zero-extended bit by bit while a carry remains, and a
/// final carry extends the result by one bit.
fn add_binary(lhs: &str, rhs: &str) -> String {
    let mut lhs = lhs.bytes().rev();
    let mut rhs = rhs.bytes().rev();
    let mut carry = 0u8;
    let mut sum = Vec::new();
    loop {
        let (left, right) = (lhs.next(), rhs.next());
        if left.is_none() && right.is_none() {
            break;
        }
        let total = left.map_or(0, |bit| bit - b'0') + right.map_or(0, |bit| bit - b'0') + carry;
        sum.push(if total % 2 == 1 { '1' } else { '0' });
        carry = total / 2;
    }
    if carry == 1 {
        sum.push('1');
    }
    sum.into_iter().rev().collect()
}

fn complement(bits: &str) -> String {
    bits.chars()
        .map(|bit| if bit == '1' { '0' } else { '1' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_non_negative_values_zero_extended() {
        assert_eq!(int_to_twos_complement(0, 8), "00000000");
        assert_eq!(int_to_twos_complement(5, 8), "00000101");
        assert_eq!(int_to_twos_complement(127, 8), "01111111");
    }

    #[test]
    fn encodes_negative_values_as_complement_plus_one() {
        assert_eq!(int_to_twos_complement(-1, 8), "11111111");
        assert_eq!(int_to_twos_complement(-128, 8), "10000000");
        assert_eq!(int_to_twos_complement(-32768, 16), "1000000000000000");
    }

    #[test]
    fn empty_bit_string_decodes_to_zero() {
        assert_eq!(bit_string_to_int(""), 0);
    }

    #[test]
    fn decodes_most_significant_bit_first() {
        assert_eq!(bit_string_to_int("10000000"), 128);
        assert_eq!(bit_string_to_int("0000000000000101"), 5);
        assert_eq!(bit_string_to_int("1111111111111111"), 65535);
    }

    #[test]
    fn addition_propagates_carry_across_unequal_lengths() {
        assert_eq!(add_binary("1111", "1"), "10000");
        assert_eq!(add_binary("1", "1111"), "10000");
        assert_eq!(add_binary("0011", "0001"), "0100");
        assert_eq!(add_binary("", ""), "");
    }

    #[test]
    fn sixteen_bit_round_trip_over_full_signed_range() {
        for value in -32768..=32767 {
            let bits = int_to_twos_complement(value, 16);
            assert_eq!(bits.len(), 16, "width drift for {value}");
            let decoded = bit_string_to_int(&bits) as u16 as i16;
            assert_eq!(i32::from(decoded), value);
        }
    }
}
