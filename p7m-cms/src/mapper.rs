// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mapping from the generic ASN.1 tree to typed CMS structures.
//!
//! The mapper is deliberately strict about structure and field order
//! (RFC 5652) while staying agnostic about the encapsulated content type:
//! callers decide what to do with a non-`id-data` payload.

use std::fmt;

use p7m_asn1::Asn1Node;

use crate::model::{
    AlgorithmIdentifier, ContentInfo, EncapsulatedContentInfo, SignedAttributes, SignedData,
    SignerIdentifier, SignerInfo,
};
use crate::{oid, Oid};

/// Why an ASN.1 tree is not a usable CMS SignedData.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The outer content type is not id-signedData; carries the actual OID
    /// in dotted form for diagnostics.
    UnexpectedContentType(String),
    /// Structurally valid ASN.1 that does not conform to the SignedData
    /// layout; carries the offending field for diagnostics.
    MalformedSignedData(String),
    /// The envelope carries a detached signature and no embedded content.
    DetachedContent,
    /// The signerInfos set is empty.
    NoSignerInfo,
    /// A CMSVersion outside the RFC 5652 range.
    UnsupportedVersion(u64),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnexpectedContentType(oid) => {
                write!(f, "content type is not id-signedData: {oid}")
            }
            MapError::MalformedSignedData(what) => write!(f, "malformed SignedData: {what}"),
            MapError::DetachedContent => {
                write!(f, "detached signature: the envelope carries no embedded content")
            }
            MapError::NoSignerInfo => write!(f, "SignedData contains no SignerInfo"),
            MapError::UnsupportedVersion(v) => write!(f, "unsupported CMSVersion: {v}"),
        }
    }
}

impl std::error::Error for MapError {}

fn malformed(what: impl Into<String>) -> MapError {
    MapError::MalformedSignedData(what.into())
}

/// Map a decoded envelope to SignedData.
///
/// Composes [`map_content_info`] and [`map_signed_data`], enforcing that the
/// outer content type is id-signedData.
pub fn map(root: &Asn1Node<'_>) -> Result<SignedData, MapError> {
    let content_info = map_content_info(root)?;
    if content_info.content_type != oid::ID_SIGNED_DATA {
        return Err(MapError::UnexpectedContentType(content_info.content_type.dotted()));
    }
    map_signed_data(content_info.content)
}

/// Map the outer ContentInfo: `SEQUENCE { contentType OID, [0] EXPLICIT content }`.
pub fn map_content_info<'a>(root: &'a Asn1Node<'a>) -> Result<ContentInfo<'a>, MapError> {
    if !root.is_sequence() {
        return Err(malformed("ContentInfo is not a SEQUENCE"));
    }
    if root.children.len() != 2 {
        return Err(malformed("ContentInfo does not have exactly two elements"));
    }
    let content_type = root.children[0]
        .oid_content()
        .map(Oid::from_content)
        .ok_or_else(|| malformed("ContentInfo contentType is not an OID"))?;

    let wrapper = &root.children[1];
    if !wrapper.is_context(0) || !wrapper.constructed || wrapper.children.len() != 1 {
        return Err(malformed("ContentInfo content is not a [0] EXPLICIT wrapper"));
    }

    Ok(ContentInfo { content_type, content: &wrapper.children[0] })
}

/// Map a SignedData SEQUENCE per RFC 5652 §5.1 field order.
pub fn map_signed_data(node: &Asn1Node<'_>) -> Result<SignedData, MapError> {
    if !node.is_sequence() {
        return Err(malformed("SignedData is not a SEQUENCE"));
    }
    let mut fields = node.children.iter().peekable();

    let version = fields
        .next()
        .and_then(Asn1Node::integer_u64)
        .ok_or_else(|| malformed("version is not an INTEGER"))?;
    if !matches!(version, 1 | 3 | 4 | 5) {
        return Err(MapError::UnsupportedVersion(version));
    }

    let digest_algorithms = fields
        .next()
        .filter(|n| n.is_set())
        .ok_or_else(|| malformed("digestAlgorithms is not a SET"))?
        .children
        .iter()
        .map(map_algorithm_identifier)
        .collect::<Result<Vec<_>, _>>()?;

    let encap_content_info = fields
        .next()
        .ok_or_else(|| malformed("encapContentInfo is missing"))
        .and_then(map_encap_content_info)?;

    // certificates [0] IMPLICIT OPTIONAL
    let mut certificates = Vec::new();
    if let Some(certs) = fields.next_if(|n| n.is_context(0)) {
        for cert in &certs.children {
            // Only plain Certificate SEQUENCEs; attribute-certificate
            // choices ([1]..[3]) are skipped, not rejected.
            if cert.is_sequence() {
                certificates.push(cert.raw.to_vec());
            }
        }
    }

    // crls [1] IMPLICIT OPTIONAL: ignored by this pipeline.
    fields.next_if(|n| n.is_context(1));

    let signer_infos = fields
        .next()
        .filter(|n| n.is_set())
        .ok_or_else(|| malformed("signerInfos is not a SET"))?
        .children
        .iter()
        .map(map_signer_info)
        .collect::<Result<Vec<_>, _>>()?;
    if signer_infos.is_empty() {
        return Err(MapError::NoSignerInfo);
    }
    if fields.next().is_some() {
        return Err(malformed("unexpected field after signerInfos"));
    }

    Ok(SignedData { version, digest_algorithms, encap_content_info, certificates, signer_infos })
}

fn map_encap_content_info(node: &Asn1Node<'_>) -> Result<EncapsulatedContentInfo, MapError> {
    if !node.is_sequence() || node.children.is_empty() || node.children.len() > 2 {
        return Err(malformed("encapContentInfo is not a two-element SEQUENCE"));
    }
    let content_type = node.children[0]
        .oid_content()
        .map(Oid::from_content)
        .ok_or_else(|| malformed("eContentType is not an OID"))?;

    let content = match node.children.get(1) {
        None => None,
        Some(wrapper) => {
            if !wrapper.is_context(0) || !wrapper.constructed || wrapper.children.len() != 1 {
                return Err(malformed("eContent is not a [0] EXPLICIT wrapper"));
            }
            // A present-but-empty OCTET STRING is a legal zero-length
            // payload, distinct from an absent eContent.
            let bytes = wrapper.children[0]
                .octet_string_value()
                .ok_or_else(|| malformed("eContent is not an OCTET STRING"))?;
            Some(bytes)
        }
    };

    Ok(EncapsulatedContentInfo { content_type, content })
}

fn map_algorithm_identifier(node: &Asn1Node<'_>) -> Result<AlgorithmIdentifier, MapError> {
    if !node.is_sequence() || node.children.is_empty() {
        return Err(malformed("AlgorithmIdentifier is not a SEQUENCE"));
    }
    let algorithm = node.children[0]
        .oid_content()
        .map(Oid::from_content)
        .ok_or_else(|| malformed("AlgorithmIdentifier algorithm is not an OID"))?;
    // Parameters (absent or NULL for every algorithm in scope) are ignored.
    Ok(AlgorithmIdentifier { algorithm })
}

fn map_signer_info(node: &Asn1Node<'_>) -> Result<SignerInfo, MapError> {
    if !node.is_sequence() {
        return Err(malformed("SignerInfo is not a SEQUENCE"));
    }
    let mut fields = node.children.iter().peekable();

    let version = fields
        .next()
        .and_then(Asn1Node::integer_u64)
        .ok_or_else(|| malformed("SignerInfo version is not an INTEGER"))?;

    let sid = fields
        .next()
        .ok_or_else(|| malformed("SignerInfo sid is missing"))
        .and_then(map_signer_identifier)?;

    let digest_algorithm = fields
        .next()
        .ok_or_else(|| malformed("SignerInfo digestAlgorithm is missing"))
        .and_then(map_algorithm_identifier)?;

    // signedAttrs [0] IMPLICIT OPTIONAL
    let signed_attrs = match fields.next_if(|n| n.is_context(0) && n.constructed) {
        Some(attrs) => Some(map_signed_attributes(attrs)?),
        None => None,
    };

    let signature_algorithm = fields
        .next()
        .ok_or_else(|| malformed("SignerInfo signatureAlgorithm is missing"))
        .and_then(map_algorithm_identifier)?;

    let signature = fields
        .next()
        .and_then(Asn1Node::octet_string_value)
        .ok_or_else(|| malformed("SignerInfo signature is not an OCTET STRING"))?;

    // unsignedAttrs [1] IMPLICIT OPTIONAL: noted but not interpreted.
    let has_unsigned_attrs = match fields.next() {
        None => false,
        Some(n) if n.is_context(1) => true,
        Some(_) => return Err(malformed("unexpected field after SignerInfo signature")),
    };
    if fields.next().is_some() {
        return Err(malformed("unexpected field after SignerInfo unsignedAttrs"));
    }

    Ok(SignerInfo {
        version,
        sid,
        digest_algorithm,
        signed_attrs,
        signature_algorithm,
        signature,
        has_unsigned_attrs,
    })
}

fn map_signer_identifier(node: &Asn1Node<'_>) -> Result<SignerIdentifier, MapError> {
    if node.is_sequence() {
        if node.children.len() != 2 {
            return Err(malformed("IssuerAndSerialNumber is not a two-element SEQUENCE"));
        }
        let issuer = &node.children[0];
        if !issuer.is_sequence() {
            return Err(malformed("issuer is not a Name SEQUENCE"));
        }
        let serial = node.children[1]
            .integer_content()
            .ok_or_else(|| malformed("serialNumber is not an INTEGER"))?;
        return Ok(SignerIdentifier::IssuerAndSerial {
            issuer: issuer.raw.to_vec(),
            serial: serial.to_vec(),
        });
    }
    // subjectKeyIdentifier [0] IMPLICIT OCTET STRING (primitive).
    if node.is_context(0) && !node.constructed {
        return Ok(SignerIdentifier::SubjectKeyIdentifier(node.value.to_vec()));
    }
    Err(malformed("sid is neither IssuerAndSerialNumber nor subjectKeyIdentifier"))
}

fn map_signed_attributes(node: &Asn1Node<'_>) -> Result<SignedAttributes, MapError> {
    let mut message_digest = None;
    let mut content_type = None;

    for attr in &node.children {
        if !attr.is_sequence() || attr.children.len() != 2 {
            return Err(malformed("signed attribute is not an Attribute SEQUENCE"));
        }
        let attr_type = attr.children[0]
            .oid_content()
            .ok_or_else(|| malformed("attribute type is not an OID"))?;
        let values = &attr.children[1];
        if !values.is_set() {
            return Err(malformed("attribute values are not a SET"));
        }

        if attr_type == oid::ID_MESSAGE_DIGEST {
            let value = values
                .children
                .first()
                .and_then(Asn1Node::octet_string_value)
                .ok_or_else(|| malformed("message-digest attribute is not an OCTET STRING"))?;
            message_digest = Some(value);
        } else if attr_type == oid::ID_CONTENT_TYPE {
            let value = values
                .children
                .first()
                .and_then(Asn1Node::oid_content)
                .map(Oid::from_content)
                .ok_or_else(|| malformed("content-type attribute is not an OID"))?;
            content_type = Some(value);
        }
    }

    Ok(SignedAttributes { raw: node.raw.to_vec(), message_digest, content_type })
}
