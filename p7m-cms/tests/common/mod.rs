// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `p7m-cms` integration tests.
//!
//! A small definite-length DER builder, mirroring the structure the mapper
//! expects. This is a focused test helper, not a general-purpose encoder.

#![allow(dead_code)]

/// One DER value under construction.
#[derive(Clone, Debug)]
pub(crate) enum Der {
    /// Identifier octet plus content octets.
    Primitive(u8, Vec<u8>),
    /// Identifier octet (constructed bit included) plus children.
    Constructed(u8, Vec<Der>),
    /// Pre-encoded TLV, spliced in verbatim.
    Raw(Vec<u8>),
}

impl Der {
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        match self {
            Der::Primitive(id, content) => {
                out.push(*id);
                push_length(out, content.len());
                out.extend_from_slice(content);
            }
            Der::Constructed(id, children) => {
                let mut body = Vec::new();
                for child in children {
                    child.encode_into(&mut body);
                }
                out.push(*id);
                push_length(out, body.len());
                out.extend_from_slice(&body);
            }
            Der::Raw(tlv) => out.extend_from_slice(tlv),
        }
    }
}

fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes: Vec<u8> = len.to_be_bytes().iter().copied().skip_while(|&b| b == 0).collect();
    out.push(0x80 | bytes.len() as u8);
    out.extend_from_slice(&bytes);
}

pub(crate) fn seq(children: Vec<Der>) -> Der {
    Der::Constructed(0x30, children)
}

pub(crate) fn set(children: Vec<Der>) -> Der {
    Der::Constructed(0x31, children)
}

/// Context-specific constructed tag `[n]`.
pub(crate) fn ctx(n: u8, children: Vec<Der>) -> Der {
    Der::Constructed(0xA0 | n, children)
}

/// Context-specific primitive tag `[n]`.
pub(crate) fn ctx_prim(n: u8, content: &[u8]) -> Der {
    Der::Primitive(0x80 | n, content.to_vec())
}

pub(crate) fn oid(content: &[u8]) -> Der {
    Der::Primitive(0x06, content.to_vec())
}

pub(crate) fn octets(content: &[u8]) -> Der {
    Der::Primitive(0x04, content.to_vec())
}

pub(crate) fn null() -> Der {
    Der::Primitive(0x05, Vec::new())
}

pub(crate) fn int(value: u64) -> Der {
    let mut bytes: Vec<u8> =
        value.to_be_bytes().iter().copied().skip_while(|&b| b == 0).collect();
    if bytes.is_empty() {
        bytes.push(0);
    }
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }
    Der::Primitive(0x02, bytes)
}

pub(crate) fn algorithm(oid_content: &[u8]) -> Der {
    seq(vec![oid(oid_content)])
}

/// IssuerAndSerialNumber from raw issuer Name DER and serial content octets.
pub(crate) fn issuer_and_serial(issuer_der: &[u8], serial: &[u8]) -> Der {
    seq(vec![Der::Raw(issuer_der.to_vec()), Der::Primitive(0x02, serial.to_vec())])
}

/// An Attribute: `SEQUENCE { attrType, SET { value } }`.
pub(crate) fn attribute(attr_type: &[u8], value: Der) -> Der {
    seq(vec![oid(attr_type), set(vec![value])])
}

/// A minimal SignerInfo without signed attributes.
pub(crate) fn signer_info(
    sid: Der,
    digest_alg: &[u8],
    signature_alg: &[u8],
    signature: &[u8],
) -> Der {
    seq(vec![
        int(1),
        sid,
        algorithm(digest_alg),
        algorithm(signature_alg),
        octets(signature),
    ])
}

/// A full envelope: `ContentInfo { id-signedData, [0] { SignedData } }`.
///
/// `content` of `None` produces a detached envelope (absent eContent).
pub(crate) fn envelope(
    content: Option<&[u8]>,
    certificates: Vec<Vec<u8>>,
    signer_infos: Vec<Der>,
) -> Vec<u8> {
    envelope_with_types(
        p7m_cms::oid::ID_SIGNED_DATA,
        p7m_cms::oid::ID_DATA,
        content,
        certificates,
        signer_infos,
    )
}

pub(crate) fn envelope_with_types(
    outer_type: &[u8],
    econtent_type: &[u8],
    content: Option<&[u8]>,
    certificates: Vec<Vec<u8>>,
    signer_infos: Vec<Der>,
) -> Vec<u8> {
    let eci = match content {
        Some(bytes) => seq(vec![oid(econtent_type), ctx(0, vec![octets(bytes)])]),
        None => seq(vec![oid(econtent_type)]),
    };

    let mut fields = vec![int(1), set(vec![algorithm(p7m_cms::oid::SHA_256)]), eci];
    if !certificates.is_empty() {
        fields.push(ctx(0, certificates.into_iter().map(Der::Raw).collect()));
    }
    fields.push(set(signer_infos));

    seq(vec![oid(outer_type), ctx(0, vec![seq(fields)])]).encode()
}
