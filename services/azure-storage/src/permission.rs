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

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use sasign_core::{Error, Result};

use crate::ResourceKind;

/// Operation granted by a service SAS.
///
/// Variants are declared in the order the service expects them in the
/// signed permissions field, `Ord` follows that order.
///
/// - [Permissions for a directory, container, or blob](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas#permissions-for-a-directory-container-or-blob)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    Read,
    Add,
    Create,
    Write,
    Delete,
    DeleteVersion,
    PermanentDelete,
    List,
    Tag,
    Filter,
    Move,
    Execute,
    SetImmutabilityPolicy,
    Ownership,
    Permissions,
}

impl Permission {
    /// Every permission, in canonical order.
    pub const ALL: [Permission; 15] = [
        Permission::Read,
        Permission::Add,
        Permission::Create,
        Permission::Write,
        Permission::Delete,
        Permission::DeleteVersion,
        Permission::PermanentDelete,
        Permission::List,
        Permission::Tag,
        Permission::Filter,
        Permission::Move,
        Permission::Execute,
        Permission::SetImmutabilityPolicy,
        Permission::Ownership,
        Permission::Permissions,
    ];

    /// The reserved character of this permission.
    pub fn as_char(self) -> char {
        match self {
            Permission::Read => 'r',
            Permission::Add => 'a',
            Permission::Create => 'c',
            Permission::Write => 'w',
            Permission::Delete => 'd',
            Permission::DeleteVersion => 'x',
            Permission::PermanentDelete => 'y',
            Permission::List => 'l',
            Permission::Tag => 't',
            Permission::Filter => 'f',
            Permission::Move => 'm',
            Permission::Execute => 'e',
            Permission::SetImmutabilityPolicy => 'i',
            Permission::Ownership => 'o',
            Permission::Permissions => 'p',
        }
    }

    /// Lookup a permission by its reserved character.
    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_char() == c)
    }

    /// Whether a SAS scoped to `kind` may carry this permission.
    pub fn is_supported_by(self, kind: ResourceKind) -> bool {
        use ResourceKind::*;

        match self {
            Permission::Read | Permission::Write | Permission::Delete => true,
            Permission::Add | Permission::Create => {
                !matches!(kind, BlobVersion | BlobSnapshot)
            }
            Permission::DeleteVersion
            | Permission::PermanentDelete
            | Permission::Tag
            | Permission::SetImmutabilityPolicy => kind != Directory,
            Permission::List => matches!(kind, Container | Directory),
            Permission::Filter => kind == Container,
            Permission::Move
            | Permission::Execute
            | Permission::Ownership
            | Permission::Permissions => matches!(kind, Container | Directory | Blob),
        }
    }
}

/// Deduplicated set of [`Permission`]s.
///
/// Always serialized in canonical order, whatever order permissions were
/// added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Create an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a permission set for a resource of `kind`.
    ///
    /// Fails with `InvalidPermission` when `kind` doesn't support one of the
    /// flags.
    pub fn from_flags(
        kind: ResourceKind,
        flags: impl IntoIterator<Item = Permission>,
    ) -> Result<Self> {
        let set: Self = flags.into_iter().collect();
        set.validate_for(kind)?;
        Ok(set)
    }

    /// Add a permission.
    pub fn with(mut self, permission: Permission) -> Self {
        self.0.insert(permission);
        self
    }

    /// Add a permission, returns false if it was already present.
    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    /// Check if the permission is granted.
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Check if nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of granted permissions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// Check every permission against the resource kind.
    pub fn validate_for(&self, kind: ResourceKind) -> Result<()> {
        match self.iter().find(|p| !p.is_supported_by(kind)) {
            Some(p) => Err(Error::invalid_permission(format!(
                "permission '{}' ({p:?}) is not supported for {kind} resources",
                p.as_char()
            ))),
            None => Ok(()),
        }
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for PermissionSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| {
                Permission::from_char(c).ok_or_else(|| {
                    Error::invalid_permission(format!("unknown permission character {c:?}"))
                })
            })
            .collect()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.iter() {
            write!(f, "{}", p.as_char())?;
        }
        Ok(())
    }
}
