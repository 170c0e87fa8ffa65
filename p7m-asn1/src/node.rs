// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decoded node tree and value accessors.

use std::fmt;

use crate::tag;

/// ASN.1 identifier class (bits 8-7 of the identifier octet).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

/// One decoded BER/DER node.
///
/// `raw` is the full tag-length-value span (including the end-of-contents
/// octets for indefinite-length nodes); `value` is the content span only.
/// Both borrow from the input buffer, and a child's spans always lie inside
/// its parent's spans.
#[derive(Debug, Clone)]
pub struct Asn1Node<'a> {
    pub class: Class,
    pub number: u32,
    pub constructed: bool,
    pub raw: &'a [u8],
    pub value: &'a [u8],
    /// Child nodes; empty for primitive nodes.
    pub children: Vec<Asn1Node<'a>>,
}

impl<'a> Asn1Node<'a> {
    pub fn is_universal(&self, number: u32) -> bool {
        self.class == Class::Universal && self.number == number
    }

    pub fn is_sequence(&self) -> bool {
        self.constructed && self.is_universal(tag::SEQUENCE)
    }

    pub fn is_set(&self) -> bool {
        self.constructed && self.is_universal(tag::SET)
    }

    /// True for a context-specific node with the given tag number.
    pub fn is_context(&self, number: u32) -> bool {
        self.class == Class::ContextSpecific && self.number == number
    }

    /// Content octets of a primitive OBJECT IDENTIFIER.
    pub fn oid_content(&self) -> Option<&'a [u8]> {
        if !self.constructed && self.is_universal(tag::OBJECT_IDENTIFIER) && !self.value.is_empty()
        {
            Some(self.value)
        } else {
            None
        }
    }

    /// Value of a primitive INTEGER as `u64`.
    ///
    /// Returns `None` for non-integers, negative values, and values that do
    /// not fit in 64 bits. CMS only uses small non-negative integers where
    /// this is called (versions).
    pub fn integer_u64(&self) -> Option<u64> {
        if self.constructed || !self.is_universal(tag::INTEGER) || self.value.is_empty() {
            return None;
        }
        if self.value[0] & 0x80 != 0 {
            return None;
        }
        let digits = if self.value[0] == 0 { &self.value[1..] } else { self.value };
        if digits.len() > 8 {
            return None;
        }
        let mut out = 0u64;
        for &b in digits {
            out = (out << 8) | u64::from(b);
        }
        Some(out)
    }

    /// Content octets of a primitive INTEGER, as encoded.
    pub fn integer_content(&self) -> Option<&'a [u8]> {
        if !self.constructed && self.is_universal(tag::INTEGER) && !self.value.is_empty() {
            Some(self.value)
        } else {
            None
        }
    }

    /// Value bytes of an OCTET STRING.
    ///
    /// BER permits constructed octet strings whose content is split across
    /// nested segments; those are flattened here so callers always see the
    /// logical byte string regardless of how the producer chose to wrap it.
    pub fn octet_string_value(&self) -> Option<Vec<u8>> {
        if !self.is_universal(tag::OCTET_STRING) {
            return None;
        }
        if !self.constructed {
            return Some(self.value.to_vec());
        }
        let mut out = Vec::new();
        if collect_octet_segments(&self.children, &mut out) {
            Some(out)
        } else {
            None
        }
    }
}

fn collect_octet_segments(children: &[Asn1Node<'_>], out: &mut Vec<u8>) -> bool {
    for child in children {
        if !child.is_universal(tag::OCTET_STRING) {
            return false;
        }
        if child.constructed {
            if !collect_octet_segments(&child.children, out) {
                return false;
            }
        } else {
            out.extend_from_slice(child.value);
        }
    }
    true
}

/// Why a buffer could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended before a declared tag, length, or value completed.
    TruncatedInput,
    /// A length encoding is invalid (reserved octet, overflow, or an
    /// indefinite length on a primitive node).
    InvalidLength,
    /// A tag uses an identifier form outside the supported subset.
    UnsupportedTagForm,
    /// Constructed nesting exceeded the configured ceiling.
    NestingTooDeep,
    /// Bytes remain after the single expected top-level object.
    TrailingInput,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TruncatedInput => write!(f, "input ended before the encoding completed"),
            DecodeError::InvalidLength => write!(f, "invalid length encoding"),
            DecodeError::UnsupportedTagForm => write!(f, "unsupported tag identifier form"),
            DecodeError::NestingTooDeep => write!(f, "constructed nesting exceeds the ceiling"),
            DecodeError::TrailingInput => write!(f, "trailing bytes after the encoding"),
        }
    }
}

impl std::error::Error for DecodeError {}
