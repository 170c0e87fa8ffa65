// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Policy-driven content extraction from CMS/PKCS#7 SignedData envelopes.
//!
//! A `.p7m` file wraps a payload (typically a FatturaPA invoice XML) in a
//! BER- or DER-encoded CMS SignedData structure. This crate decodes the
//! envelope, verifies its signatures against the embedded certificates and
//! an optional trust store, and releases the payload bytes only when the
//! caller's [`ExtractionPolicy`] is satisfied.
//!
//! ```no_run
//! use p7m::{extract, ExtractionPolicy, TrustStore};
//!
//! let envelope = std::fs::read("invoice.xml.p7m")?;
//! let now = std::time::SystemTime::now()
//!     .duration_since(std::time::UNIX_EPOCH)?
//!     .as_secs() as i64;
//! let extraction = extract(&envelope, &TrustStore::new(), now, &ExtractionPolicy::default())?;
//! std::fs::write("invoice.xml", &extraction.content)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Extraction never performs I/O and never reads a clock: the reference
//! time for certificate validity is always an explicit argument.

mod extract;
mod policy;

pub use extract::{extract, Extraction, ExtractionError};
pub use policy::{ExtractionPolicy, SignerAcceptance};

pub use p7m_asn1::{decode, Asn1Node, DecodeError, DecodeLimits};
pub use p7m_cms::{MapError, Oid, SignedData, SignerInfo};
pub use p7m_validation::{SignerVerification, TrustStore, VerificationResult};
