// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CMS (RFC 5652) SignedData data model and structure mapper.
//!
//! This crate interprets the generic ASN.1 tree produced by `p7m-asn1` as
//! `ContentInfo` → `SignedData` → `EncapsulatedContentInfo` plus the signer
//! and certificate sets. All CMS-specific policy lives here: OID checks,
//! field order, optional tagged fields, and the distinction between a
//! detached and an empty encapsulated content.
//!
//! The mapper copies what it needs out of the borrowed tree, so the mapped
//! structures own their bytes and outlive the input buffer.

pub mod mapper;
pub mod model;
pub mod oid;

pub use mapper::{map, map_content_info, map_signed_data, MapError};
pub use model::{
    AlgorithmIdentifier, ContentInfo, EncapsulatedContentInfo, SignedAttributes, SignedData,
    SignerIdentifier, SignerInfo,
};
pub use oid::Oid;
