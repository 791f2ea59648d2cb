//! Huffman codec for HPACK string literals.
//!
//! The encoder packs code bits MSB-first and pads the final partial
//! octet with one-bits (the EOS prefix). The decoder is a table-driven
//! DFA that consumes one nibble per step; each state maps a nibble to
//! the bytes it completes, the follow-on state, and whether stopping
//! there leaves only valid padding behind.

use std::sync::OnceLock;

use crate::error::{Error, Result};

use super::huffman_table::{HuffmanCode, EOS, REQUEST_CODES, RESPONSE_CODES};
use super::Direction;

fn codes_for(direction: Direction) -> &'static [HuffmanCode; 257] {
    match direction {
        Direction::Request => &REQUEST_CODES,
        Direction::Response => &RESPONSE_CODES,
    }
}

/// Number of octets `input` occupies once Huffman-coded.
pub fn encoded_len(input: &[u8], direction: Direction) -> usize {
    let codes = codes_for(direction);
    let bits: usize = input.iter().map(|&b| codes[b as usize].len as usize).sum();
    bits.div_ceil(8)
}

/// Huffman-code a byte string.
pub fn encode(input: &[u8], direction: Direction) -> Vec<u8> {
    let codes = codes_for(direction);
    let mut output = Vec::with_capacity(encoded_len(input, direction));
    let mut accumulator: u64 = 0;
    let mut bit_count: u8 = 0;

    for &byte in input {
        let entry = &codes[byte as usize];

        // Pack code into the accumulator (MSB-first).
        accumulator = (accumulator << entry.len) | entry.code as u64;
        bit_count += entry.len;

        // Flush complete octets.
        while bit_count >= 8 {
            bit_count -= 8;
            output.push((accumulator >> bit_count) as u8);
        }
    }

    // Pad the final partial octet with the EOS prefix (all ones).
    if bit_count > 0 {
        let padding = 8 - bit_count;
        accumulator = (accumulator << padding) | ((1u64 << padding) - 1);
        output.push(accumulator as u8);
    }

    output
}

/// Decode a Huffman-coded byte string.
pub fn decode(input: &[u8], direction: Direction) -> Result<Vec<u8>> {
    let machine = match direction {
        Direction::Request => request_machine(),
        Direction::Response => response_machine(),
    };

    let mut output = Vec::with_capacity(input.len() * 2);
    let mut state = 0usize;

    for &byte in input {
        for nibble in [byte >> 4, byte & 0xf] {
            let step = &machine.transitions[state][nibble as usize];
            if step.eos {
                return Err(Error::compression("EOS found"));
            }
            if let Some(emitted) = step.emit {
                output.push(emitted);
            }
            state = step.next as usize;
        }
    }

    if !machine.accepting[state] {
        return Err(Error::compression("EOS invalid"));
    }
    Ok(output)
}

/// One DFA transition: consume four bits from `state`.
#[derive(Debug, Clone, Copy)]
struct Step {
    next: u16,
    emit: Option<u8>,
    /// The four bits walked through the EOS code.
    eos: bool,
}

/// Nibble-at-a-time decode machine for one code table.
struct Machine {
    transitions: Vec<[Step; 16]>,
    /// States whose path from the last emitted symbol is all one-bits,
    /// i.e. states where the remaining bits are valid padding.
    accepting: Vec<bool>,
}

fn request_machine() -> &'static Machine {
    static MACHINE: OnceLock<Machine> = OnceLock::new();
    MACHINE.get_or_init(|| Machine::build(&REQUEST_CODES))
}

fn response_machine() -> &'static Machine {
    static MACHINE: OnceLock<Machine> = OnceLock::new();
    MACHINE.get_or_init(|| Machine::build(&RESPONSE_CODES))
}

impl Machine {
    fn build(codes: &[HuffmanCode; 257]) -> Self {
        // Binary code trie. Node 0 is the root; leaves carry a symbol.
        #[derive(Clone)]
        struct Node {
            children: [Option<u32>; 2],
            symbol: Option<u16>,
        }
        let mut trie = vec![Node {
            children: [None, None],
            symbol: None,
        }];

        for (symbol, code) in codes.iter().enumerate() {
            let mut node = 0usize;
            for shift in (0..code.len).rev() {
                let bit = ((code.code >> shift) & 1) as usize;
                node = match trie[node].children[bit] {
                    Some(next) => next as usize,
                    None => {
                        trie.push(Node {
                            children: [None, None],
                            symbol: None,
                        });
                        let next = (trie.len() - 1) as u32;
                        trie[node].children[bit] = Some(next);
                        next as usize
                    }
                };
            }
            trie[node].symbol = Some(symbol as u16);
        }

        // Walk four bits from every interior node to build the machine.
        // A leaf resolves to its symbol and resets to the root, so at
        // most one byte is emitted per nibble (no code is shorter than
        // four bits).
        let states = trie.len();
        let mut transitions = vec![
            [Step {
                next: 0,
                emit: None,
                eos: false,
            }; 16];
            states
        ];
        let mut accepting = vec![false; states];

        // Accepting states sit on the all-ones path from the root.
        let mut node = 0usize;
        loop {
            accepting[node] = true;
            match trie[node].children[1] {
                Some(next) if trie[next as usize].symbol.is_none() => node = next as usize,
                _ => break,
            }
        }

        for state in 0..states {
            if trie[state].symbol.is_some() {
                continue; // leaves are never resting states
            }
            for nibble in 0u8..16 {
                let mut node = state;
                let mut emit = None;
                let mut eos = false;
                for shift in (0..4).rev() {
                    let bit = ((nibble >> shift) & 1) as usize;
                    node = match trie[node].children[bit] {
                        Some(next) => next as usize,
                        None => {
                            // Unreachable for a complete code: every
                            // interior node has two children.
                            eos = true;
                            break;
                        }
                    };
                    if let Some(symbol) = trie[node].symbol {
                        if symbol as usize == EOS {
                            eos = true;
                            break;
                        }
                        emit = Some(symbol as u8);
                        node = 0;
                    }
                }
                transitions[state][nibble as usize] = Step {
                    next: node as u16,
                    emit,
                    eos,
                };
            }
        }

        Self {
            transitions,
            accepting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_vectors() {
        let www = encode(b"www.example.com", Direction::Request);
        assert_eq!(
            www,
            [0xe7, 0xcf, 0x9b, 0xeb, 0xe8, 0x9b, 0x6f, 0xb1, 0x6f, 0xa9, 0xb6, 0xff]
        );
        let no_cache = encode(b"no-cache", Direction::Request);
        assert_eq!(no_cache, [0xb9, 0xb9, 0x94, 0x95, 0x56, 0xbf]);
    }

    #[test]
    fn test_response_vectors() {
        let cases: [(&[u8], &[u8]); 3] = [
            (b"302", &[0x64, 0x02]),
            (b"private", &[0xae, 0xc3, 0x77, 0x1a, 0x4b]),
            (
                b"https://www.example.com",
                &[
                    0x9d, 0x29, 0xad, 0x17, 0x18, 0x63, 0xc7, 0x8f, 0x0b, 0x97, 0xc8, 0xe9,
                    0xae, 0x82, 0xae, 0x43, 0xd3,
                ],
            ),
        ];
        for (plain, wire) in cases {
            assert_eq!(encode(plain, Direction::Response), wire);
            assert_eq!(decode(wire, Direction::Response).unwrap(), plain);
        }
    }

    #[test]
    fn test_round_trip_all_bytes() {
        let every_byte: Vec<u8> = (0..=255u8).collect();
        for direction in [Direction::Request, Direction::Response] {
            let encoded = encode(&every_byte, direction);
            assert_eq!(decode(&encoded, direction).unwrap(), every_byte);
        }
    }

    #[test]
    fn test_empty_string() {
        for direction in [Direction::Request, Direction::Response] {
            assert!(encode(&[], direction).is_empty());
            assert!(decode(&[], direction).unwrap().is_empty());
        }
    }

    #[test]
    fn test_invalid_padding_rejected() {
        // 'a' is 01001; valid padding is 111 (0x4f). 011 strays off the
        // ones path and is too short to be a code.
        let err = decode(&[0x4b], Direction::Request).unwrap_err();
        assert!(err.to_string().contains("EOS invalid"), "{err}");
    }

    #[test]
    fn test_eos_in_stream_rejected() {
        // Enough one-bits to traverse the full EOS code in either table.
        for direction in [Direction::Request, Direction::Response] {
            let err = decode(&[0xff, 0xff, 0xff, 0xff], direction).unwrap_err();
            assert!(err.to_string().contains("EOS found"), "{err}");
        }
    }

    #[test]
    fn test_padding_up_to_seven_bits_accepted() {
        // 'a' in the request table is five bits, leaving three pad bits.
        let encoded = encode(b"a", Direction::Request);
        assert_eq!(encoded.len(), 1);
        assert_eq!(decode(&encoded, Direction::Request).unwrap(), b"a");
    }
}
