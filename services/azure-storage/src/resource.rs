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

use std::fmt;

use sasign_core::{Error, Result};

/// Kind of resource a service SAS is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A single blob.
    Blob,
    /// A specific version of a blob.
    BlobVersion,
    /// A blob snapshot.
    BlobSnapshot,
    /// A container and every blob in it.
    Container,
    /// A directory of a hierarchical namespace account.
    Directory,
}

impl ResourceKind {
    /// Value of the signed resource (`sr`) field.
    pub fn code(self) -> &'static str {
        match self {
            ResourceKind::Blob => "b",
            ResourceKind::BlobVersion => "bv",
            ResourceKind::BlobSnapshot => "bs",
            ResourceKind::Container => "c",
            ResourceKind::Directory => "d",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Blob => write!(f, "blob"),
            ResourceKind::BlobVersion => write!(f, "blob version"),
            ResourceKind::BlobSnapshot => write!(f, "blob snapshot"),
            ResourceKind::Container => write!(f, "container"),
            ResourceKind::Directory => write!(f, "directory"),
        }
    }
}

/// The storage entity a service SAS grants access to.
///
/// Names are kept verbatim. Percent-encoding only happens when a URI is
/// assembled, never in the signed canonical resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceScope {
    /// A single blob.
    Blob {
        /// Storage account name.
        account: String,
        /// Container name.
        container: String,
        /// Blob name, may contain `/`.
        blob: String,
    },
    /// A specific version of a blob.
    BlobVersion {
        /// Storage account name.
        account: String,
        /// Container name.
        container: String,
        /// Blob name, may contain `/`.
        blob: String,
        /// Version id, as returned in `x-ms-version-id`.
        version_id: String,
    },
    /// A blob snapshot.
    BlobSnapshot {
        /// Storage account name.
        account: String,
        /// Container name.
        container: String,
        /// Blob name, may contain `/`.
        blob: String,
        /// Snapshot time, as returned in `x-ms-snapshot`.
        snapshot: String,
    },
    /// A container.
    Container {
        /// Storage account name.
        account: String,
        /// Container name.
        container: String,
    },
    /// A directory, only meaningful with hierarchical namespace enabled.
    Directory {
        /// Storage account name.
        account: String,
        /// Container name.
        container: String,
        /// Directory path, may contain `/`.
        path: String,
    },
}

impl ResourceScope {
    /// Build a validated scope of `kind`.
    ///
    /// Blob and directory scopes need a non-empty `path`, a container scope
    /// must not have one. Versions and snapshots also need their id, build
    /// them with [`ResourceScope::blob_version`] or
    /// [`ResourceScope::blob_snapshot`].
    pub fn new(
        kind: ResourceKind,
        account: &str,
        container: &str,
        path: Option<&str>,
    ) -> Result<Self> {
        let scope = match (kind, path) {
            (ResourceKind::Container, None) => Self::container(account, container),
            (ResourceKind::Container, Some(path)) => {
                return Err(Error::invalid_resource_scope(format!(
                    "container scope must not include a path, got {path:?}"
                )))
            }
            (ResourceKind::Blob, Some(path)) => Self::blob(account, container, path),
            (ResourceKind::Directory, Some(path)) => Self::directory(account, container, path),
            (ResourceKind::Blob | ResourceKind::Directory, None) => {
                return Err(Error::invalid_resource_scope(format!(
                    "{kind} scope requires a non-empty path"
                )))
            }
            (ResourceKind::BlobVersion | ResourceKind::BlobSnapshot, _) => {
                return Err(Error::invalid_resource_scope(format!(
                    "{kind} scope requires an id besides the path"
                )))
            }
        };

        scope.validate()?;
        Ok(scope)
    }

    /// Scope to a single blob.
    pub fn blob(account: &str, container: &str, blob: &str) -> Self {
        Self::Blob {
            account: account.to_string(),
            container: container.to_string(),
            blob: blob.to_string(),
        }
    }

    /// Scope to one version of a blob.
    pub fn blob_version(account: &str, container: &str, blob: &str, version_id: &str) -> Self {
        Self::BlobVersion {
            account: account.to_string(),
            container: container.to_string(),
            blob: blob.to_string(),
            version_id: version_id.to_string(),
        }
    }

    /// Scope to one snapshot of a blob.
    pub fn blob_snapshot(account: &str, container: &str, blob: &str, snapshot: &str) -> Self {
        Self::BlobSnapshot {
            account: account.to_string(),
            container: container.to_string(),
            blob: blob.to_string(),
            snapshot: snapshot.to_string(),
        }
    }

    /// Scope to a container.
    pub fn container(account: &str, container: &str) -> Self {
        Self::Container {
            account: account.to_string(),
            container: container.to_string(),
        }
    }

    /// Scope to a directory.
    pub fn directory(account: &str, container: &str, path: &str) -> Self {
        Self::Directory {
            account: account.to_string(),
            container: container.to_string(),
            path: path.to_string(),
        }
    }

    /// Kind of this scope.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceScope::Blob { .. } => ResourceKind::Blob,
            ResourceScope::BlobVersion { .. } => ResourceKind::BlobVersion,
            ResourceScope::BlobSnapshot { .. } => ResourceKind::BlobSnapshot,
            ResourceScope::Container { .. } => ResourceKind::Container,
            ResourceScope::Directory { .. } => ResourceKind::Directory,
        }
    }

    /// Value of the signed resource (`sr`) field.
    pub fn resource_type_code(&self) -> &'static str {
        self.kind().code()
    }

    /// Storage account name.
    pub fn account(&self) -> &str {
        match self {
            ResourceScope::Blob { account, .. }
            | ResourceScope::BlobVersion { account, .. }
            | ResourceScope::BlobSnapshot { account, .. }
            | ResourceScope::Container { account, .. }
            | ResourceScope::Directory { account, .. } => account,
        }
    }

    /// Container name.
    pub fn container_name(&self) -> &str {
        match self {
            ResourceScope::Blob { container, .. }
            | ResourceScope::BlobVersion { container, .. }
            | ResourceScope::BlobSnapshot { container, .. }
            | ResourceScope::Container { container, .. }
            | ResourceScope::Directory { container, .. } => container,
        }
    }

    /// Blob name or directory path below the container, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            ResourceScope::Blob { blob, .. }
            | ResourceScope::BlobVersion { blob, .. }
            | ResourceScope::BlobSnapshot { blob, .. } => Some(blob),
            ResourceScope::Directory { path, .. } => Some(path),
            ResourceScope::Container { .. } => None,
        }
    }

    /// Value of the signed snapshot time field: the snapshot time or the
    /// version id.
    pub fn snapshot_time(&self) -> Option<&str> {
        match self {
            ResourceScope::BlobVersion { version_id, .. } => Some(version_id),
            ResourceScope::BlobSnapshot { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Number of path segments of a directory scope, sent as `sdd`.
    pub fn directory_depth(&self) -> Option<usize> {
        match self {
            ResourceScope::Directory { path, .. } => Some(
                path.split('/')
                    .filter(|segment| !segment.is_empty())
                    .count(),
            ),
            _ => None,
        }
    }

    /// Canonicalized resource: `/blob/<account>/<container>[/<path>]`.
    pub fn canonical_path(&self) -> String {
        let mut s = format!("/blob/{}/{}", self.account(), self.container_name());
        if let Some(path) = self.path() {
            s.push('/');
            s.push_str(path);
        }
        s
    }

    /// Check that the scope describes an addressable resource.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();

        if self.account().is_empty() {
            return Err(Error::invalid_resource_scope(format!(
                "{kind} scope requires an account name"
            )));
        }
        if self.account().contains('/') {
            return Err(Error::invalid_resource_scope(format!(
                "account name {:?} must not contain '/'",
                self.account()
            )));
        }
        if self.container_name().is_empty() {
            return Err(Error::invalid_resource_scope(format!(
                "{kind} scope requires a container name"
            )));
        }
        // A slash in the container name would smuggle a blob path into a
        // container scope.
        if self.container_name().contains('/') {
            return Err(Error::invalid_resource_scope(format!(
                "container name {:?} must not contain a path",
                self.container_name()
            )));
        }

        if let Some(path) = self.path() {
            if path.trim_matches('/').is_empty() {
                return Err(Error::invalid_resource_scope(format!(
                    "{kind} scope requires a non-empty path"
                )));
            }
            // Joined to the container with a single slash, both here and in uris.
            if path.starts_with('/') {
                return Err(Error::invalid_resource_scope(format!(
                    "{kind} path {path:?} must not start with '/'"
                )));
            }
        }

        match self {
            ResourceScope::BlobVersion { version_id, .. } if version_id.is_empty() => Err(
                Error::invalid_resource_scope("blob version scope requires a version id"),
            ),
            ResourceScope::BlobSnapshot { snapshot, .. } if snapshot.is_empty() => Err(
                Error::invalid_resource_scope("blob snapshot scope requires a snapshot time"),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ResourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.canonical_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sasign_core::ErrorKind;
    use test_case::test_case;

    #[test_case(ResourceScope::blob("acc", "c", "some/file.txt"), "b", "/blob/acc/c/some/file.txt"; "blob")]
    #[test_case(ResourceScope::blob_version("acc", "c", "f", "2024-01-01T00:00:00.0000000Z"), "bv", "/blob/acc/c/f"; "version")]
    #[test_case(ResourceScope::blob_snapshot("acc", "c", "f", "2024-01-01T00:00:00.0000000Z"), "bs", "/blob/acc/c/f"; "snapshot")]
    #[test_case(ResourceScope::container("acc", "c"), "c", "/blob/acc/c"; "container")]
    #[test_case(ResourceScope::directory("acc", "c", "a/b"), "d", "/blob/acc/c/a/b"; "directory")]
    fn test_codes_and_canonical_path(scope: ResourceScope, code: &str, path: &str) {
        assert!(scope.validate().is_ok());
        assert_eq!(scope.resource_type_code(), code);
        assert_eq!(scope.canonical_path(), path);
    }

    #[test]
    fn test_canonical_path_is_not_encoded() {
        let scope = ResourceScope::blob("acc", "c", "dir/a b+c%20ü.txt");
        assert_eq!(scope.canonical_path(), "/blob/acc/c/dir/a b+c%20ü.txt");
    }

    #[test]
    fn test_snapshot_time() {
        assert_eq!(
            ResourceScope::blob_version("a", "c", "b", "v1").snapshot_time(),
            Some("v1")
        );
        assert_eq!(
            ResourceScope::blob_snapshot("a", "c", "b", "s1").snapshot_time(),
            Some("s1")
        );
        assert_eq!(ResourceScope::blob("a", "c", "b").snapshot_time(), None);
    }

    #[test]
    fn test_directory_depth() {
        assert_eq!(
            ResourceScope::directory("a", "c", "x/y/z").directory_depth(),
            Some(3)
        );
        assert_eq!(
            ResourceScope::directory("a", "c", "/x/y/").directory_depth(),
            Some(2)
        );
        assert_eq!(ResourceScope::container("a", "c").directory_depth(), None);
    }

    #[test_case(ResourceScope::blob("acc", "c", ""); "blob without path")]
    #[test_case(ResourceScope::blob("acc", "c", "/"); "blob with only slash")]
    #[test_case(ResourceScope::blob("acc", "c", "/a.txt"); "blob with leading slash")]
    #[test_case(ResourceScope::directory("acc", "c", "/a/b"); "directory with leading slash")]
    #[test_case(ResourceScope::directory("acc", "c", ""); "directory without path")]
    #[test_case(ResourceScope::container("acc", "c/blob"); "container with blob path")]
    #[test_case(ResourceScope::container("acc", ""); "container without name")]
    #[test_case(ResourceScope::container("", "c"); "missing account")]
    #[test_case(ResourceScope::blob_version("acc", "c", "b", ""); "version without id")]
    #[test_case(ResourceScope::blob_snapshot("acc", "c", "b", ""); "snapshot without time")]
    fn test_invalid_scope(scope: ResourceScope) {
        let err = scope.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResourceScope);
    }

    #[test]
    fn test_new_checks_path_against_kind() {
        let scope = ResourceScope::new(ResourceKind::Blob, "acc", "c", Some("a/b.txt")).unwrap();
        assert_eq!(scope, ResourceScope::blob("acc", "c", "a/b.txt"));
        let scope = ResourceScope::new(ResourceKind::Container, "acc", "c", None).unwrap();
        assert_eq!(scope, ResourceScope::container("acc", "c"));

        for (kind, path) in [
            (ResourceKind::Container, Some("a/b.txt")),
            (ResourceKind::Blob, None),
            (ResourceKind::Blob, Some("")),
            (ResourceKind::Directory, None),
            (ResourceKind::BlobVersion, Some("a/b.txt")),
            (ResourceKind::BlobSnapshot, Some("a/b.txt")),
        ] {
            let err = ResourceScope::new(kind, "acc", "c", path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidResourceScope);
        }
    }
}
