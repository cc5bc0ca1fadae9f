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

//! Account SAS: delegates access to the service level resource set of a
//! whole storage account.
//!
//! - [Create an account SAS](https://learn.microsoft.com/en-us/rest/api/storageservices/create-account-sas)

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use sasign_core::hash::base64_encode;
use sasign_core::time::DateTime;
use sasign_core::{Error, Result};

use crate::constants::*;
use crate::{AccessConstraints, Credential, IpRange, Protocol, SasToken};

/// Services an account SAS is valid for (`ss`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccountServices {
    /// Blob service.
    pub blob: bool,
    /// Queue service.
    pub queue: bool,
    /// Table service.
    pub table: bool,
    /// File service.
    pub file: bool,
}

impl AccountServices {
    /// Every service.
    pub fn all() -> Self {
        Self {
            blob: true,
            queue: true,
            table: true,
            file: true,
        }
    }

    /// Check if no service is selected.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for AccountServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (enabled, c) in [
            (self.blob, 'b'),
            (self.queue, 'q'),
            (self.table, 't'),
            (self.file, 'f'),
        ] {
            if enabled {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for AccountServices {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut v = Self::default();
        for c in s.chars() {
            match c {
                'b' => v.blob = true,
                'q' => v.queue = true,
                't' => v.table = true,
                'f' => v.file = true,
                _ => {
                    return Err(Error::invalid_resource_scope(format!(
                        "unknown signed service {c:?}"
                    )))
                }
            }
        }
        Ok(v)
    }
}

/// Resource types an account SAS is valid for (`srt`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccountResourceTypes {
    /// Service level APIs, like list containers.
    pub service: bool,
    /// Container level APIs.
    pub container: bool,
    /// Object level APIs, like put blob.
    pub object: bool,
}

impl AccountResourceTypes {
    /// Every resource type.
    pub fn all() -> Self {
        Self {
            service: true,
            container: true,
            object: true,
        }
    }

    /// Check if no resource type is selected.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for AccountResourceTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (enabled, c) in [(self.service, 's'), (self.container, 'c'), (self.object, 'o')] {
            if enabled {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for AccountResourceTypes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut v = Self::default();
        for c in s.chars() {
            match c {
                's' => v.service = true,
                'c' => v.container = true,
                'o' => v.object = true,
                _ => {
                    return Err(Error::invalid_resource_scope(format!(
                        "unknown signed resource type {c:?}"
                    )))
                }
            }
        }
        Ok(v)
    }
}

/// Operation granted by an account SAS, declared in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccountPermission {
    Read,
    Write,
    Delete,
    DeleteVersion,
    PermanentDelete,
    List,
    Add,
    Create,
    Update,
    Process,
    Tag,
    Filter,
    SetImmutabilityPolicy,
}

impl AccountPermission {
    /// Every permission, in canonical order.
    pub const ALL: [AccountPermission; 13] = [
        AccountPermission::Read,
        AccountPermission::Write,
        AccountPermission::Delete,
        AccountPermission::DeleteVersion,
        AccountPermission::PermanentDelete,
        AccountPermission::List,
        AccountPermission::Add,
        AccountPermission::Create,
        AccountPermission::Update,
        AccountPermission::Process,
        AccountPermission::Tag,
        AccountPermission::Filter,
        AccountPermission::SetImmutabilityPolicy,
    ];

    /// The reserved character of this permission.
    pub fn as_char(self) -> char {
        match self {
            AccountPermission::Read => 'r',
            AccountPermission::Write => 'w',
            AccountPermission::Delete => 'd',
            AccountPermission::DeleteVersion => 'x',
            AccountPermission::PermanentDelete => 'y',
            AccountPermission::List => 'l',
            AccountPermission::Add => 'a',
            AccountPermission::Create => 'c',
            AccountPermission::Update => 'u',
            AccountPermission::Process => 'p',
            AccountPermission::Tag => 't',
            AccountPermission::Filter => 'f',
            AccountPermission::SetImmutabilityPolicy => 'i',
        }
    }
}

/// Deduplicated set of [`AccountPermission`]s, serialized in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccountPermissions(BTreeSet<AccountPermission>);

impl AccountPermissions {
    /// Add a permission.
    pub fn with(mut self, permission: AccountPermission) -> Self {
        self.0.insert(permission);
        self
    }

    /// Check if nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<AccountPermission> for AccountPermissions {
    fn from_iter<T: IntoIterator<Item = AccountPermission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for AccountPermissions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| {
                AccountPermission::ALL
                    .into_iter()
                    .find(|p| p.as_char() == c)
                    .ok_or_else(|| {
                        Error::invalid_permission(format!("unknown account permission {c:?}"))
                    })
            })
            .collect()
    }
}

impl fmt::Display for AccountPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.0 {
            write!(f, "{}", p.as_char())?;
        }
        Ok(())
    }
}

/// Builder for an account SAS.
#[derive(Debug, Clone)]
pub struct AccountSasBuilder {
    services: AccountServices,
    resource_types: AccountResourceTypes,
    permissions: AccountPermissions,
    constraints: AccessConstraints,
    encryption_scope: Option<String>,
    version: String,
}

impl Default for AccountSasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountSasBuilder {
    /// Create an unconfigured builder signing with the default version.
    pub fn new() -> Self {
        Self {
            services: AccountServices::default(),
            resource_types: AccountResourceTypes::default(),
            permissions: AccountPermissions::default(),
            constraints: AccessConstraints::default(),
            encryption_scope: None,
            version: SAS_VERSION.to_string(),
        }
    }

    /// Set the services.
    pub fn with_services(mut self, services: AccountServices) -> Self {
        self.services = services;
        self
    }

    /// Set the resource types.
    pub fn with_resource_types(mut self, resource_types: AccountResourceTypes) -> Self {
        self.resource_types = resource_types;
        self
    }

    /// Set the permissions.
    pub fn with_permissions(mut self, permissions: AccountPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Set the start time.
    pub fn with_start(mut self, start: DateTime) -> Self {
        self.constraints = self.constraints.with_start(start);
        self
    }

    /// Set the expiry time.
    pub fn with_expiry(mut self, expiry: DateTime) -> Self {
        self.constraints = self.constraints.with_expiry(expiry);
        self
    }

    /// Set the allowed ip range.
    pub fn with_ip_range(mut self, ip_range: IpRange) -> Self {
        self.constraints = self.constraints.with_ip_range(ip_range);
        self
    }

    /// Set the allowed protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.constraints = self.constraints.with_protocol(protocol);
        self
    }

    /// Set the encryption scope, only signed from version 2020-12-06.
    pub fn with_encryption_scope(mut self, scope: &str) -> Self {
        self.encryption_scope = Some(scope.to_string());
        self
    }

    /// Sign with an older service version.
    ///
    /// The layout of the string to sign follows the version.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    fn signs_encryption_scope(&self) -> bool {
        // Versions are ISO dates, so they order lexicographically.
        self.version.as_str() >= ENCRYPTION_SCOPE_VERSION
    }

    /// Construct string to sign
    ///
    /// ## Format
    ///
    /// ```text
    /// accountname + "\n" +
    /// signedpermissions + "\n" +
    /// signedservice + "\n" +
    /// signedresourcetype + "\n" +
    /// signedstart + "\n" +
    /// signedexpiry + "\n" +
    /// signedIP + "\n" +
    /// signedProtocol + "\n" +
    /// signedversion + "\n" +
    /// signedEncryptionScope + "\n"   (2020-12-06 and later)
    /// ```
    pub fn string_to_sign(&self, account_name: &str) -> String {
        let mut s = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            account_name,
            self.permissions,
            self.services,
            self.resource_types,
            self.constraints.signed_start().unwrap_or_default(),
            self.constraints.signed_expiry().unwrap_or_default(),
            self.constraints.signed_ip().unwrap_or_default(),
            self.constraints.signed_protocol().unwrap_or_default(),
            self.version,
        );
        if self.signs_encryption_scope() {
            s.push_str(self.encryption_scope.as_deref().unwrap_or_default());
            s.push('\n');
        }

        debug!("account sas string to sign: {:?}", &s);
        s
    }

    /// Validate the configuration, then sign it.
    pub fn build(&self, credential: Option<&Credential>) -> Result<SasToken> {
        let Some(credential) = credential else {
            return Err(Error::missing_credential(
                "a shared key credential is required to sign an account sas",
            ));
        };

        if self.services.is_empty() {
            return Err(Error::incomplete_configuration(
                "account sas requires at least one service",
            ));
        }
        if self.resource_types.is_empty() {
            return Err(Error::incomplete_configuration(
                "account sas requires at least one resource type",
            ));
        }
        if self.permissions.is_empty() {
            return Err(Error::incomplete_configuration(
                "account sas requires permissions",
            ));
        }
        let Some(expiry) = self.constraints.signed_expiry() else {
            return Err(Error::incomplete_configuration(
                "account sas requires an expiry",
            ));
        };
        self.constraints.validate()?;

        let string_to_sign = self.string_to_sign(credential.account_name());
        let signature = base64_encode(&credential.sign(string_to_sign.as_bytes()));

        let mut params: Vec<(&'static str, String)> = vec![
            (SIGNED_VERSION, self.version.clone()),
            (SIGNED_SERVICES, self.services.to_string()),
            (SIGNED_RESOURCE_TYPES, self.resource_types.to_string()),
            (SIGNED_EXPIRY, expiry),
            (SIGNED_PERMISSIONS, self.permissions.to_string()),
        ];
        if let Some(start) = self.constraints.signed_start() {
            params.push((SIGNED_START, start));
        }
        if let Some(ip) = self.constraints.signed_ip() {
            params.push((SIGNED_IP, ip));
        }
        if let Some(protocol) = self.constraints.signed_protocol() {
            params.push((SIGNED_PROTOCOL, protocol.to_string()));
        }
        if let (true, Some(scope)) = (self.signs_encryption_scope(), &self.encryption_scope) {
            params.push((SIGNED_ENCRYPTION_SCOPE, scope.clone()));
        }
        params.push((SIGNATURE, signature));

        Ok(SasToken::new(params))
    }
}
