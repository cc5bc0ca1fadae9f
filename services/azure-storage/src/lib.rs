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

//! Shared Access Signatures for Azure Blob Storage.
//!
//! This crate builds SAS tokens signed with a storage account shared key:
//! - Service SAS for a container, a directory, a blob, a blob snapshot or a
//!   blob version
//! - Account SAS for the service level resources of a whole account
//!
//! Nothing here talks to the network. Tokens are built locally and appended
//! to resource uris.
//!
//! # Example
//!
//! ```rust
//! use sasign_azure_storage::{BlobContainerClient, Credential, Permission, SasBuilder};
//!
//! # fn main() -> sasign_core::Result<()> {
//! let credential = Credential::from_base64_key(
//!     "devstoreaccount1",
//!     "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==",
//! )?;
//! let container = BlobContainerClient::new(
//!     "http://127.0.0.1:10000/devstoreaccount1/testing".parse()?,
//!     Some(credential),
//! )?;
//!
//! let uri = container.generate_sas_uri(
//!     &SasBuilder::new()
//!         .with_permission(Permission::List)
//!         .with_expiry(sasign_core::time::now() + chrono::TimeDelta::minutes(1)),
//! )?;
//! assert!(uri.query().unwrap_or_default().contains("sr=c&sp=l"));
//! # Ok(())
//! # }
//! ```

mod constants;

mod permission;
pub use permission::{Permission, PermissionSet};

mod resource;
pub use resource::{ResourceKind, ResourceScope};

mod constraints;
pub use constraints::{AccessConstraints, IpRange, Protocol};

mod credential;
pub use credential::Credential;

mod signer;
pub use signer::{SasSigner, SignedExtras};

mod builder;
pub use builder::SasBuilder;

mod token;
pub use token::SasToken;

mod account_sas;
pub use account_sas::{
    AccountPermission, AccountPermissions, AccountResourceTypes, AccountSasBuilder,
    AccountServices,
};

mod config;
pub use config::Config;

mod client;
pub use client::{BlobClient, BlobContainerClient, BlobServiceClient};

pub use sasign_core::time::DateTime;
