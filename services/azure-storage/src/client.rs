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

//! URI level clients that hand out SAS URIs for the resources they point at.
//!
//! They never send requests. A client built without a credential can still
//! address resources, but can't sign.

use std::sync::Arc;

use http::Uri;
use log::debug;
use percent_encoding::utf8_percent_encode;
use sasign_core::{Error, Result, UriBuilder};

use crate::constants::{AZURE_QUERY_ENCODE_SET, SNAPSHOT, VERSION_ID};
use crate::{AccountSasBuilder, Config, Credential, ResourceScope, SasBuilder};

fn require_credential(credential: &Option<Arc<Credential>>) -> Result<&Credential> {
    credential.as_deref().ok_or_else(|| {
        Error::missing_credential("client is not configured with a shared key credential")
    })
}

fn push_encoded_path(uri: &Uri, name: &str) -> Result<Uri> {
    let mut builder = UriBuilder::build(uri)?;
    // Query of the parent addresses the parent only.
    builder.query.clear();
    builder.path_push(&utf8_percent_encode(name, &AZURE_QUERY_ENCODE_SET).to_string());
    builder.apply()
}

/// Client for the blob service of one storage account.
#[derive(Debug, Clone)]
pub struct BlobServiceClient {
    uri: Uri,
    credential: Option<Arc<Credential>>,
}

impl BlobServiceClient {
    /// Create a client for the service at `uri`.
    pub fn new(uri: Uri, credential: Option<Credential>) -> Self {
        Self {
            uri,
            credential: credential.map(Arc::new),
        }
    }

    /// Create a client from [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let uri = endpoint.parse::<Uri>().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint:?} is not a valid uri"))
                .with_source(e)
        })?;
        if uri.authority().is_none() {
            return Err(Error::config_invalid(format!(
                "endpoint {endpoint:?} must be an absolute uri"
            )));
        }

        Ok(Self::new(uri, config.credential()?))
    }

    /// Service uri.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Client for the container `name` of this account.
    pub fn container_client(&self, name: &str) -> Result<BlobContainerClient> {
        if name.is_empty() || name.contains('/') {
            return Err(Error::invalid_resource_scope(format!(
                "invalid container name {name:?}"
            )));
        }

        Ok(BlobContainerClient {
            uri: push_encoded_path(&self.uri, name)?,
            container_name: name.to_string(),
            credential: self.credential.clone(),
        })
    }

    /// Check if this client is able to sign an account SAS.
    pub fn can_generate_account_sas(&self) -> bool {
        self.credential.is_some()
    }

    /// Sign `builder` and append the account SAS to the service uri.
    pub fn generate_account_sas_uri(&self, builder: &AccountSasBuilder) -> Result<Uri> {
        let credential = require_credential(&self.credential)?;
        let token = builder.build(Some(credential))?;
        token.append_to(&self.uri)
    }
}

/// Client for one blob container.
#[derive(Debug, Clone)]
pub struct BlobContainerClient {
    uri: Uri,
    container_name: String,
    credential: Option<Arc<Credential>>,
}

impl BlobContainerClient {
    /// Create a client for the container at `uri`.
    ///
    /// The container name is the last segment of the uri path, so both
    /// `https://acc.blob.core.windows.net/testing` and the path style
    /// `http://127.0.0.1:10000/devstoreaccount1/testing` work.
    pub fn new(uri: Uri, credential: Option<Credential>) -> Result<Self> {
        let container_name = UriBuilder::build(&uri)?
            .last_path_segment()
            .ok_or_else(|| {
                Error::request_invalid(format!("uri {uri} doesn't name a container"))
            })?;

        Ok(Self {
            uri,
            container_name,
            credential: credential.map(Arc::new),
        })
    }

    /// Container uri.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Container name.
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Client for the blob `name` in this container.
    ///
    /// `name` may contain `/` to address a virtual directory.
    pub fn blob_client(&self, name: &str) -> Result<BlobClient> {
        if name.trim_matches('/').is_empty() || name.starts_with('/') {
            return Err(Error::invalid_resource_scope(format!(
                "invalid blob name {name:?}"
            )));
        }

        Ok(BlobClient {
            uri: push_encoded_path(&self.uri, name)?,
            container_name: self.container_name.clone(),
            blob_name: name.to_string(),
            snapshot: None,
            version_id: None,
            credential: self.credential.clone(),
        })
    }

    /// Check if this client is able to sign a SAS.
    pub fn can_generate_sas_uri(&self) -> bool {
        self.credential.is_some()
    }

    /// Sign `builder` for this container and append the token to its uri.
    ///
    /// Any resource set on `builder` is replaced by this container, owned by
    /// the credential's account.
    pub fn generate_sas_uri(&self, builder: &SasBuilder) -> Result<Uri> {
        let credential = require_credential(&self.credential)?;
        let resource = ResourceScope::container(credential.account_name(), &self.container_name);
        debug!("generating sas uri for {resource}");

        let token = builder.clone().with_resource(resource).build(Some(credential))?;
        token.append_to(&self.uri)
    }
}

/// Client for one blob, optionally pinned to a snapshot or a version.
#[derive(Debug, Clone)]
pub struct BlobClient {
    uri: Uri,
    container_name: String,
    blob_name: String,
    snapshot: Option<String>,
    version_id: Option<String>,
    credential: Option<Arc<Credential>>,
}

impl BlobClient {
    /// Pin this client to a snapshot, dropping any version.
    pub fn with_snapshot(mut self, snapshot: &str) -> Self {
        self.snapshot = Some(snapshot.to_string());
        self.version_id = None;
        self
    }

    /// Pin this client to a version, dropping any snapshot.
    pub fn with_version_id(mut self, version_id: &str) -> Self {
        self.version_id = Some(version_id.to_string());
        self.snapshot = None;
        self
    }

    /// Container name.
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Blob name.
    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    /// Blob uri, carrying the snapshot or version query if pinned.
    pub fn uri(&self) -> Result<Uri> {
        let pinned = match (&self.snapshot, &self.version_id) {
            (Some(v), _) => Some((SNAPSHOT, v)),
            (None, Some(v)) => Some((VERSION_ID, v)),
            (None, None) => None,
        };
        let Some((key, value)) = pinned else {
            return Ok(self.uri.clone());
        };

        let mut builder = UriBuilder::build(&self.uri)?;
        builder.query_push(
            key,
            utf8_percent_encode(value, &AZURE_QUERY_ENCODE_SET).to_string(),
        );
        builder.apply()
    }

    /// Check if this client is able to sign a SAS.
    pub fn can_generate_sas_uri(&self) -> bool {
        self.credential.is_some()
    }

    /// Sign `builder` for this blob and append the token to its uri.
    ///
    /// Any resource set on `builder` is replaced by this blob, snapshot or
    /// version, owned by the credential's account.
    pub fn generate_sas_uri(&self, builder: &SasBuilder) -> Result<Uri> {
        let credential = require_credential(&self.credential)?;
        let account = credential.account_name();
        let resource = match (&self.snapshot, &self.version_id) {
            (Some(snapshot), _) => ResourceScope::blob_snapshot(
                account,
                &self.container_name,
                &self.blob_name,
                snapshot,
            ),
            (None, Some(version_id)) => ResourceScope::blob_version(
                account,
                &self.container_name,
                &self.blob_name,
                version_id,
            ),
            (None, None) => ResourceScope::blob(account, &self.container_name, &self.blob_name),
        };
        debug!("generating sas uri for {resource}");

        let token = builder.clone().with_resource(resource).build(Some(credential))?;
        token.append_to(&self.uri()?)
    }
}
