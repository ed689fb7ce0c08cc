//! LZ-string compression over the URI-safe alphabet.
//!
//! Output is identical to `compressToEncodedURIComponent` from the lz-string
//! JavaScript library, so links produced in a browser decode here and vice
//! versa. The algorithm operates on UTF-16 code units, as JavaScript strings do.

use std::collections::{HashMap, HashSet};

/// Only the first 64 characters are emitted; `$` is accepted when reading.
const URI_SAFE_ALPHABET: &[u8; 65] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-$";

const BITS_PER_CHAR: u32 = 6;

/// Initial read mask for a 6-bit character (its highest bit).
const READ_RESET: u32 = 1 << (BITS_PER_CHAR - 1);

/// Code written before a literal 8-bit unit.
const CODE_CHAR8: u32 = 0;
/// Code written before a literal 16-bit unit.
const CODE_CHAR16: u32 = 1;
/// End of stream.
const CODE_END: u32 = 2;

/// Compress `input` into URI-safe characters.
pub fn compress_to_encoded_uri_component(input: &str) -> String {
    let mut compressor = Compressor::new();
    let mut w: Vec<u16> = Vec::new();

    for unit in input.encode_utf16() {
        if !compressor.dictionary.contains_key([unit].as_slice()) {
            compressor.insert(vec![unit]);
            compressor.pending.insert(unit);
        }

        let mut wc = w.clone();
        wc.push(unit);
        if compressor.dictionary.contains_key(&wc) {
            w = wc;
        } else {
            compressor.emit(&w);
            compressor.insert(wc);
            w = vec![unit];
        }
    }

    if !w.is_empty() {
        compressor.emit(&w);
    }

    compressor.writer.write(CODE_END, compressor.num_bits);
    compressor.writer.finish()
}

/// Decompress a string produced by [`compress_to_encoded_uri_component`].
///
/// Returns `None` for empty input, characters outside the alphabet, a broken
/// back-reference, or output that is not valid UTF-16. Spaces are read as
/// `+`, since form encoding tends to turn one into the other.
pub fn decompress_from_encoded_uri_component(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    let values = input
        .chars()
        .map(|ch| uri_value(if ch == ' ' { '+' } else { ch }))
        .collect::<Option<Vec<u32>>>()?;

    let units = decompress_units(&values)?;
    String::from_utf16(&units).ok()
}

fn uri_value(ch: char) -> Option<u32> {
    URI_SAFE_ALPHABET
        .iter()
        .position(|&b| char::from(b) == ch)
        .map(|i| i as u32)
}

struct Compressor {
    dictionary: HashMap<Vec<u16>, u32>,
    /// Single units that are in the dictionary but have not been written yet.
    pending: HashSet<u16>,
    dict_size: u32,
    num_bits: u32,
    enlarge_in: u32,
    writer: BitWriter,
}

impl Compressor {
    fn new() -> Self {
        Self {
            dictionary: HashMap::new(),
            pending: HashSet::new(),
            dict_size: 3,
            num_bits: 2,
            enlarge_in: 2,
            writer: BitWriter::new(),
        }
    }

    fn insert(&mut self, entry: Vec<u16>) {
        self.dictionary.insert(entry, self.dict_size);
        self.dict_size += 1;
    }

    /// Write the code for `w`, introducing it as a literal on first use.
    fn emit(&mut self, w: &[u16]) {
        let first_use = w.len() == 1 && self.pending.remove(&w[0]);
        if first_use {
            let unit = u32::from(w[0]);
            if unit < 256 {
                self.writer.write(CODE_CHAR8, self.num_bits);
                self.writer.write(unit, 8);
            } else {
                self.writer.write(CODE_CHAR16, self.num_bits);
                self.writer.write(unit, 16);
            }
            self.tick();
        } else {
            let code = self.dictionary[w];
            self.writer.write(code, self.num_bits);
        }
        self.tick();
    }

    fn tick(&mut self) {
        self.enlarge_in -= 1;
        if self.enlarge_in == 0 {
            self.enlarge_in = 1 << self.num_bits;
            self.num_bits += 1;
        }
    }
}

struct BitWriter {
    out: String,
    value: u32,
    position: u32,
}

impl BitWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            value: 0,
            position: 0,
        }
    }

    /// Append one bit. Returns `true` if it completed an output character.
    fn push_bit(&mut self, bit: u32) -> bool {
        self.value = (self.value << 1) | bit;
        if self.position == BITS_PER_CHAR - 1 {
            self.out
                .push(char::from(URI_SAFE_ALPHABET[self.value as usize]));
            self.position = 0;
            self.value = 0;
            true
        } else {
            self.position += 1;
            false
        }
    }

    /// Write the low `count` bits of `value`, least significant first.
    fn write(&mut self, mut value: u32, count: u32) {
        for _ in 0..count {
            self.push_bit(value & 1);
            value >>= 1;
        }
    }

    /// Pad with zero bits up to and including the next character boundary.
    fn finish(mut self) -> String {
        while !self.push_bit(0) {}
        self.out
    }
}

struct BitReader<'a> {
    values: &'a [u32],
    value: u32,
    mask: u32,
    index: usize,
}

impl<'a> BitReader<'a> {
    fn new(values: &'a [u32]) -> Self {
        Self {
            values,
            value: values.first().copied().unwrap_or(0),
            mask: READ_RESET,
            index: 1,
        }
    }

    /// Read `count` bits, least significant first. Reads past the end yield zeros.
    fn read(&mut self, count: u32) -> u32 {
        let mut bits = 0;
        for power in 0..count {
            let bit = self.value & self.mask;
            self.mask >>= 1;
            if self.mask == 0 {
                self.mask = READ_RESET;
                self.value = self.values.get(self.index).copied().unwrap_or(0);
                self.index += 1;
            }
            if bit != 0 {
                bits |= 1 << power;
            }
        }
        bits
    }

    fn exhausted(&self) -> bool {
        self.index > self.values.len()
    }
}

fn decompress_units(values: &[u32]) -> Option<Vec<u16>> {
    let mut reader = BitReader::new(values);
    // Codes 0..=2 are control codes; the first three slots are never looked up.
    let mut dictionary: Vec<Vec<u16>> = vec![Vec::new(); 3];
    let mut enlarge_in: u32 = 4;
    let mut num_bits: u32 = 3;

    let first = match reader.read(2) {
        CODE_CHAR8 => reader.read(8) as u16,
        CODE_CHAR16 => reader.read(16) as u16,
        CODE_END => return Some(Vec::new()),
        _ => return None,
    };
    dictionary.push(vec![first]);
    let mut w = vec![first];
    let mut result = w.clone();

    loop {
        if reader.exhausted() {
            return Some(Vec::new());
        }

        let mut code = reader.read(num_bits) as usize;
        match code as u32 {
            CODE_CHAR8 | CODE_CHAR16 => {
                let width = if code as u32 == CODE_CHAR8 { 8 } else { 16 };
                dictionary.push(vec![reader.read(width) as u16]);
                code = dictionary.len() - 1;
                enlarge_in -= 1;
            }
            CODE_END => return Some(result),
            _ => {}
        }

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }

        let entry = if code < dictionary.len() {
            dictionary[code].clone()
        } else if code == dictionary.len() {
            let mut entry = w.clone();
            entry.push(w[0]);
            entry
        } else {
            return None;
        };
        result.extend_from_slice(&entry);

        let mut next = w;
        next.push(entry[0]);
        dictionary.push(next);
        enlarge_in -= 1;

        w = entry;

        if enlarge_in == 0 {
            enlarge_in = 1 << num_bits;
            num_bits += 1;
        }
    }
}
