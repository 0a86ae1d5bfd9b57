//! Identifier encoder
//!
//! Turns an ordered option set into a short identifier usable as the short
//! name of a generated class. The same options in the same insertion order
//! always encode to the same identifier; a different order is a different
//! identifier.

use indexmap::IndexMap;
use sha2::{Digest, Sha256};

use crate::ast::Literal;

/// Ordered option set used to parameterize generated class names
pub type Options = IndexMap<String, Literal>;

/// Prefix of every encoded identifier; guarantees a valid first character
pub const ENCODED_PREFIX: &str = "Generated";

/// Number of hex digest characters kept after the prefix
const DIGEST_LENGTH: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct ParameterEncoder;

impl ParameterEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode the options into a valid identifier
    pub fn encode_parameters(&self, options: &Options) -> String {
        let mut hasher = Sha256::new();
        hasher.update(canonical_options(options));
        let digest = format!("{:x}", hasher.finalize());
        format!("{ENCODED_PREFIX}{}", &digest[..DIGEST_LENGTH])
    }
}

/// Serialize in insertion order. Every value carries its type tag and every
/// string its length, so distinct option sets never share a serialization.
fn canonical_options(options: &Options) -> Vec<u8> {
    let mut out = Vec::new();
    write_map(options.iter(), options.len(), &mut out);
    out
}

fn write_map<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Literal)>,
    len: usize,
    out: &mut Vec<u8>,
) {
    out.extend_from_slice(format!("m{len}:").as_bytes());
    for (key, value) in entries {
        write_str(key, out);
        write_literal(value, out);
    }
}

fn write_str(value: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(format!("s{}:", value.len()).as_bytes());
    out.extend_from_slice(value.as_bytes());
}

fn write_literal(literal: &Literal, out: &mut Vec<u8>) {
    match literal {
        Literal::Null => out.push(b'n'),
        Literal::Bool(value) => out.extend_from_slice(if *value { b"b1" } else { b"b0" }),
        Literal::Int(value) => out.extend_from_slice(format!("i{value};").as_bytes()),
        // Bit pattern: NaN and the infinities stay distinct from null
        Literal::Float(value) => {
            out.extend_from_slice(format!("f{:016x}", value.to_bits()).as_bytes())
        }
        Literal::String(value) => write_str(value, out),
        Literal::List(items) => {
            out.extend_from_slice(format!("l{}:", items.len()).as_bytes());
            for item in items {
                write_literal(item, out);
            }
        }
        Literal::Map(entries) => write_map(entries.iter(), entries.len(), out),
    }
}
