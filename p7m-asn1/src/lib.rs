// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Generic BER/DER tag/length/value decoder.
//!
//! This crate turns a byte buffer into a navigable tree of [`Asn1Node`]s.
//! It implements exactly the encoding-rule subset that CMS envelopes in the
//! wild require:
//!
//! - single-octet and high-tag-number identifier forms,
//! - short, long, and indefinite (EOC-terminated) length forms,
//! - constructed recursion with a configurable nesting ceiling.
//!
//! The decoder is *total* over arbitrary input: any byte buffer, including
//! truncated or fuzzed data, produces either a tree or a [`DecodeError`],
//! never a panic or unbounded recursion.
//!
//! No semantic interpretation happens here. OID validity, field order, and
//! everything else CMS-specific belongs to the `p7m-cms` mapper, which keeps
//! this crate reusable for other ASN.1-based structures.

mod decoder;
mod node;

pub use decoder::{decode, decode_all, decode_with_limits, DecodeLimits};
pub use node::{Asn1Node, Class, DecodeError};

/// Universal tag numbers needed by the CMS profile.
pub mod tag {
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const BIT_STRING: u32 = 3;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OBJECT_IDENTIFIER: u32 = 6;
    pub const UTF8_STRING: u32 = 12;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
    pub const PRINTABLE_STRING: u32 = 19;
    pub const UTC_TIME: u32 = 23;
    pub const GENERALIZED_TIME: u32 = 24;
}
