// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Service SAS signer.

use std::fmt::Write;

use log::debug;
use sasign_core::hash::base64_encode;
use sasign_core::Result;

use crate::constants::SAS_VERSION;
use crate::{AccessConstraints, Credential, PermissionSet, ResourceScope};

/// Optional signed fields that don't belong to permissions, resource or
/// access constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedExtras {
    /// Stored access policy identifier (`si`).
    pub identifier: Option<String>,
    /// Encryption scope (`ses`).
    pub encryption_scope: Option<String>,
    /// Cache-Control response header override (`rscc`).
    pub cache_control: Option<String>,
    /// Content-Disposition response header override (`rscd`).
    pub content_disposition: Option<String>,
    /// Content-Encoding response header override (`rsce`).
    pub content_encoding: Option<String>,
    /// Content-Language response header override (`rscl`).
    pub content_language: Option<String>,
    /// Content-Type response header override (`rsct`).
    pub content_type: Option<String>,
}

/// Signer that implements the Azure Storage service SAS.
///
/// - [Create a service SAS](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas)
#[derive(Debug, Clone, Copy, Default)]
pub struct SasSigner;

impl SasSigner {
    /// Create a new signer.
    pub fn new() -> Self {
        Self
    }

    /// Service version signed into the token.
    pub fn version(&self) -> &'static str {
        SAS_VERSION
    }

    /// Construct string to sign
    ///
    /// ## Format
    ///
    /// ```text
    /// signedPermissions + "\n" +
    /// signedStart + "\n" +
    /// signedExpiry + "\n" +
    /// canonicalizedResource + "\n" +
    /// signedIdentifier + "\n" +
    /// signedIP + "\n" +
    /// signedProtocol + "\n" +
    /// signedVersion + "\n" +
    /// signedResource + "\n" +
    /// signedSnapshotTime + "\n" +
    /// signedEncryptionScope + "\n" +
    /// rscc + "\n" +
    /// rscd + "\n" +
    /// rsce + "\n" +
    /// rscl + "\n" +
    /// rsct
    /// ```
    ///
    /// Absent fields keep their line with an empty value.
    ///
    /// ## Reference
    ///
    /// - [Version 2020-12-06 and later](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas#version-2020-12-06-and-later)
    pub fn string_to_sign(
        &self,
        permissions: &PermissionSet,
        resource: &ResourceScope,
        constraints: &AccessConstraints,
        extras: &SignedExtras,
    ) -> Result<String> {
        let mut s = String::with_capacity(256);

        writeln!(&mut s, "{permissions}")?;
        writeln!(&mut s, "{}", constraints.signed_start().unwrap_or_default())?;
        writeln!(&mut s, "{}", constraints.signed_expiry().unwrap_or_default())?;
        writeln!(&mut s, "{}", resource.canonical_path())?;
        writeln!(&mut s, "{}", or_empty(&extras.identifier))?;
        writeln!(&mut s, "{}", constraints.signed_ip().unwrap_or_default())?;
        writeln!(
            &mut s,
            "{}",
            constraints.signed_protocol().unwrap_or_default()
        )?;
        writeln!(&mut s, "{}", self.version())?;
        writeln!(&mut s, "{}", resource.resource_type_code())?;
        writeln!(&mut s, "{}", resource.snapshot_time().unwrap_or_default())?;
        writeln!(&mut s, "{}", or_empty(&extras.encryption_scope))?;
        writeln!(&mut s, "{}", or_empty(&extras.cache_control))?;
        writeln!(&mut s, "{}", or_empty(&extras.content_disposition))?;
        writeln!(&mut s, "{}", or_empty(&extras.content_encoding))?;
        writeln!(&mut s, "{}", or_empty(&extras.content_language))?;
        write!(&mut s, "{}", or_empty(&extras.content_type))?;

        debug!("string to sign: {:?}", &s);

        Ok(s)
    }

    /// Base64 encoded HMAC-SHA256 of the string to sign.
    pub fn sign(&self, string_to_sign: &str, credential: &Credential) -> String {
        base64_encode(&credential.sign(string_to_sign.as_bytes()))
    }
}

fn or_empty(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IpRange, Permission, Protocol};
    use pretty_assertions::assert_eq;
    use sasign_core::time::parse_rfc3339;

    fn credential() -> Credential {
        Credential::from_base64_key(
            "devstoreaccount1",
            "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==",
        )
        .unwrap()
    }

    #[test]
    fn test_string_to_sign_minimal() {
        let _ = env_logger::builder().is_test(true).try_init();

        let permissions = PermissionSet::new().with(Permission::List);
        let resource = ResourceScope::container("devstoreaccount1", "testing");
        let constraints = AccessConstraints::new()
            .with_expiry(parse_rfc3339("2024-01-01T00:01:00Z").unwrap());

        let s = SasSigner::new()
            .string_to_sign(&permissions, &resource, &constraints, &SignedExtras::default())
            .unwrap();

        assert_eq!(
            s,
            "l\n\n2024-01-01T00:01:00Z\n/blob/devstoreaccount1/testing\n\n\n\n2022-11-02\nc\n\n\n\n\n\n\n"
        );
        assert_eq!(s.split('\n').count(), 16);
    }

    #[test]
    fn test_string_to_sign_every_field() {
        let permissions: PermissionSet = "wr".parse().unwrap();
        let resource = ResourceScope::blob_snapshot(
            "acc",
            "pictures",
            "profile/me.jpg",
            "2024-01-01T00:00:00.0000000Z",
        );
        let constraints = AccessConstraints::new()
            .with_start(parse_rfc3339("2024-01-01T00:00:00Z").unwrap())
            .with_expiry(parse_rfc3339("2024-01-02T00:00:00Z").unwrap())
            .with_ip_range("10.0.0.1-10.0.0.9".parse::<IpRange>().unwrap())
            .with_protocol(Protocol::HttpsAndHttp);
        let extras = SignedExtras {
            identifier: Some("policy-1".to_string()),
            encryption_scope: Some("scope".to_string()),
            cache_control: Some("no-cache".to_string()),
            content_disposition: Some("attachment".to_string()),
            content_encoding: Some("gzip".to_string()),
            content_language: Some("en".to_string()),
            content_type: Some("image/jpeg".to_string()),
        };

        let s = SasSigner::new()
            .string_to_sign(&permissions, &resource, &constraints, &extras)
            .unwrap();

        assert_eq!(
            s,
            [
                "rw",
                "2024-01-01T00:00:00Z",
                "2024-01-02T00:00:00Z",
                "/blob/acc/pictures/profile/me.jpg",
                "policy-1",
                "10.0.0.1-10.0.0.9",
                "https,http",
                "2022-11-02",
                "bs",
                "2024-01-01T00:00:00.0000000Z",
                "scope",
                "no-cache",
                "attachment",
                "gzip",
                "en",
                "image/jpeg",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_sign_matches_credential_hmac() {
        let cred = credential();
        let sig = SasSigner::new().sign("l\n\n", &cred);
        assert_eq!(sig, base64_encode(&cred.sign(b"l\n\n")));
        assert_eq!(sig, SasSigner::new().sign("l\n\n", &cred));
    }
}
