// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Typed CMS structures.
//!
//! These own their bytes (copied out of the decoded tree). Certificates are
//! deliberately kept as raw DER blobs and never re-encoded: re-encoding a
//! BER certificate changes its bytes and breaks signature matching.

use p7m_asn1::Asn1Node;

use crate::mapper::MapError;
use crate::Oid;

/// The outer CMS wrapper: a content-type OID plus the `[0] EXPLICIT`
/// content it describes.
#[derive(Debug, Clone)]
pub struct ContentInfo<'a> {
    pub content_type: Oid,
    pub content: &'a Asn1Node<'a>,
}

/// RFC 5652 §5.1 SignedData.
#[derive(Debug, Clone)]
pub struct SignedData {
    pub version: u64,
    pub digest_algorithms: Vec<AlgorithmIdentifier>,
    pub encap_content_info: EncapsulatedContentInfo,
    /// Raw DER of each certificate carried by the envelope.
    pub certificates: Vec<Vec<u8>>,
    pub signer_infos: Vec<SignerInfo>,
}

/// RFC 5652 §5.2 EncapsulatedContentInfo.
#[derive(Debug, Clone)]
pub struct EncapsulatedContentInfo {
    pub content_type: Oid,
    /// `None` is a detached signature (content stored elsewhere), which is
    /// a different state from `Some` of zero length (an empty payload).
    pub content: Option<Vec<u8>>,
}

impl EncapsulatedContentInfo {
    /// The embedded content bytes, or [`MapError::DetachedContent`] when the
    /// envelope does not carry its payload.
    pub fn require_content(&self) -> Result<&[u8], MapError> {
        self.content.as_deref().ok_or(MapError::DetachedContent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmIdentifier {
    pub algorithm: Oid,
}

/// RFC 5652 §5.3 SignerInfo.
#[derive(Debug, Clone)]
pub struct SignerInfo {
    pub version: u64,
    pub sid: SignerIdentifier,
    pub digest_algorithm: AlgorithmIdentifier,
    pub signed_attrs: Option<SignedAttributes>,
    pub signature_algorithm: AlgorithmIdentifier,
    pub signature: Vec<u8>,
    pub has_unsigned_attrs: bool,
}

/// How a SignerInfo points at its certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerIdentifier {
    IssuerAndSerial {
        /// Raw DER of the issuer Name, compared byte-for-byte.
        issuer: Vec<u8>,
        /// Content octets of the serial INTEGER, as encoded.
        serial: Vec<u8>,
    },
    SubjectKeyIdentifier(Vec<u8>),
}

/// The signed-attributes block of a SignerInfo.
///
/// `raw` keeps the complete `[0] IMPLICIT` TLV as it appeared on the wire;
/// signature verification re-tags it as `SET OF` without re-encoding the
/// body (RFC 5652 §5.4).
#[derive(Debug, Clone)]
pub struct SignedAttributes {
    pub raw: Vec<u8>,
    /// Value of the message-digest attribute, when present.
    pub message_digest: Option<Vec<u8>>,
    /// Value of the content-type attribute, when present.
    pub content_type: Option<Oid>,
}
