// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! BER/DER decoding.
//!
//! The decoder walks tag, length, and value octets over a borrowed buffer
//! and recurses into constructed content. Every length is checked against
//! the remaining buffer before any slice is taken, and recursion depth is
//! bounded by [`DecodeLimits::max_depth`], so malformed input can neither
//! over-read nor overflow the stack.

use crate::node::{Asn1Node, Class, DecodeError};

/// Decoder resource bounds.
#[derive(Debug, Copy, Clone)]
pub struct DecodeLimits {
    /// Maximum depth of constructed nesting. The default of 64 is far above
    /// anything a conforming CMS envelope produces.
    pub max_depth: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Decode exactly one top-level object.
///
/// Trailing bytes after the object are rejected with
/// [`DecodeError::TrailingInput`]; use [`decode_all`] for buffers that carry
/// several objects back to back.
pub fn decode(input: &[u8]) -> Result<Asn1Node<'_>, DecodeError> {
    decode_with_limits(input, DecodeLimits::default())
}

/// Decode exactly one top-level object with explicit limits.
pub fn decode_with_limits(input: &[u8], limits: DecodeLimits) -> Result<Asn1Node<'_>, DecodeError> {
    let (node, used) = decode_node(input, 0, limits.max_depth)?;
    if used != input.len() {
        return Err(DecodeError::TrailingInput);
    }
    Ok(node)
}

/// Decode a buffer holding one or more top-level objects.
pub fn decode_all(input: &[u8]) -> Result<Vec<Asn1Node<'_>>, DecodeError> {
    let limits = DecodeLimits::default();
    let mut rest = input;
    let mut nodes = Vec::new();
    while !rest.is_empty() {
        let (node, used) = decode_node(rest, 0, limits.max_depth)?;
        rest = &rest[used..];
        nodes.push(node);
    }
    Ok(nodes)
}

/// Decode one node starting at `buf[0]`. Returns the node and the number of
/// bytes it occupied, end-of-contents octets included.
fn decode_node(buf: &[u8], depth: usize, max_depth: usize) -> Result<(Asn1Node<'_>, usize), DecodeError> {
    if depth >= max_depth {
        return Err(DecodeError::NestingTooDeep);
    }

    let (class, number, constructed, header_len) = read_identifier(buf)?;
    let (length, length_octets) = read_length(&buf[header_len..])?;
    let content_start = header_len + length_octets;

    match length {
        Length::Definite(len) => {
            if buf.len() - content_start < len {
                return Err(DecodeError::TruncatedInput);
            }
            let value = &buf[content_start..content_start + len];
            let children = if constructed {
                decode_children(value, depth + 1, max_depth)?
            } else {
                Vec::new()
            };
            let total = content_start + len;
            Ok((
                Asn1Node { class, number, constructed, raw: &buf[..total], value, children },
                total,
            ))
        }
        Length::Indefinite => {
            // Indefinite length is only meaningful for constructed content,
            // where an end-of-contents marker can terminate it.
            if !constructed {
                return Err(DecodeError::InvalidLength);
            }
            let mut offset = content_start;
            let mut children = Vec::new();
            loop {
                let rest = &buf[offset..];
                if rest.len() < 2 {
                    return Err(DecodeError::TruncatedInput);
                }
                if rest[0] == 0x00 && rest[1] == 0x00 {
                    break;
                }
                let (child, used) = decode_node(rest, depth + 1, max_depth)?;
                children.push(child);
                offset += used;
            }
            let value = &buf[content_start..offset];
            let total = offset + 2;
            Ok((
                Asn1Node { class, number, constructed, raw: &buf[..total], value, children },
                total,
            ))
        }
    }
}

fn decode_children(content: &[u8], depth: usize, max_depth: usize) -> Result<Vec<Asn1Node<'_>>, DecodeError> {
    let mut rest = content;
    let mut children = Vec::new();
    while !rest.is_empty() {
        let (child, used) = decode_node(rest, depth, max_depth)?;
        rest = &rest[used..];
        children.push(child);
    }
    Ok(children)
}

fn read_identifier(buf: &[u8]) -> Result<(Class, u32, bool, usize), DecodeError> {
    let first = *buf.first().ok_or(DecodeError::TruncatedInput)?;
    let class = match first >> 6 {
        0 => Class::Universal,
        1 => Class::Application,
        2 => Class::ContextSpecific,
        _ => Class::Private,
    };
    let constructed = first & 0x20 != 0;
    let low = u32::from(first & 0x1F);

    if low != 0x1F {
        return Ok((class, low, constructed, 1));
    }

    // High-tag-number form: base-128 septets, high bit marks continuation.
    let mut number = 0u32;
    for (i, &b) in buf[1..].iter().enumerate() {
        // The first septet must not be a bare continuation pad.
        if i == 0 && b == 0x80 {
            return Err(DecodeError::UnsupportedTagForm);
        }
        // Five septets exhaust u32.
        if i == 4 && (number >> 25) != 0 {
            return Err(DecodeError::UnsupportedTagForm);
        }
        if i > 4 {
            return Err(DecodeError::UnsupportedTagForm);
        }
        number = (number << 7) | u32::from(b & 0x7F);
        if b & 0x80 == 0 {
            return Ok((class, number, constructed, 2 + i));
        }
    }
    Err(DecodeError::TruncatedInput)
}

enum Length {
    Definite(usize),
    Indefinite,
}

fn read_length(buf: &[u8]) -> Result<(Length, usize), DecodeError> {
    let first = *buf.first().ok_or(DecodeError::TruncatedInput)?;
    if first < 0x80 {
        return Ok((Length::Definite(usize::from(first)), 1));
    }
    if first == 0x80 {
        return Ok((Length::Indefinite, 1));
    }
    // 0xFF is reserved by X.690.
    if first == 0xFF {
        return Err(DecodeError::InvalidLength);
    }

    let count = usize::from(first & 0x7F);
    if buf.len() < 1 + count {
        return Err(DecodeError::TruncatedInput);
    }
    let mut len = 0usize;
    for &b in &buf[1..1 + count] {
        if len >> (usize::BITS - 8) != 0 {
            return Err(DecodeError::InvalidLength);
        }
        len = (len << 8) | usize::from(b);
    }
    Ok((Length::Definite(len), 1 + count))
}
