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

use log::debug;
use sasign_core::time::DateTime;
use sasign_core::{Error, Result};

use crate::constants::*;
use crate::signer::SignedExtras;
use crate::{
    AccessConstraints, Credential, IpRange, Permission, PermissionSet, Protocol, ResourceScope,
    SasSigner, SasToken,
};

/// Builder for a service SAS over a blob, blob version, blob snapshot,
/// container or directory.
///
/// Setters take the builder by value. [`SasBuilder::build`] only borrows
/// it, so one configuration can emit any number of independent tokens and
/// later changes never touch a token already built.
///
/// # Example
///
/// ```rust
/// use sasign_azure_storage::{Credential, Permission, PermissionSet, ResourceScope, SasBuilder};
/// use sasign_core::time::now;
///
/// # fn main() -> sasign_core::Result<()> {
/// let credential = Credential::from_base64_key("account", "a2V5")?;
/// let token = SasBuilder::new()
///     .with_resource(ResourceScope::container("account", "testing"))
///     .with_permissions(PermissionSet::new().with(Permission::List))
///     .with_expiry(now() + chrono::TimeDelta::minutes(1))
///     .build(Some(&credential))?;
///
/// assert_eq!(token.get("sr"), Some("c"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SasBuilder {
    permissions: PermissionSet,
    resource: Option<ResourceScope>,
    constraints: AccessConstraints,
    extras: SignedExtras,
}

impl SasBuilder {
    /// Create an unconfigured builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the granted permissions.
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    /// Grant one more permission.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    /// Set the resource the token is scoped to.
    pub fn with_resource(mut self, resource: ResourceScope) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Set the time the token becomes valid.
    ///
    /// Without a start time the token is valid as soon as it's issued.
    pub fn with_start(mut self, start: DateTime) -> Self {
        self.constraints = self.constraints.with_start(start);
        self
    }

    /// Set the time the token becomes invalid.
    pub fn with_expiry(mut self, expiry: DateTime) -> Self {
        self.constraints = self.constraints.with_expiry(expiry);
        self
    }

    /// Restrict the addresses the token may be used from.
    pub fn with_ip_range(mut self, ip_range: IpRange) -> Self {
        self.constraints = self.constraints.with_ip_range(ip_range);
        self
    }

    /// Restrict the protocol the token may be used over.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.constraints = self.constraints.with_protocol(protocol);
        self
    }

    /// Refer to a stored access policy on the container.
    ///
    /// Expiry and permissions may then come from the policy instead.
    pub fn with_identifier(mut self, identifier: &str) -> Self {
        self.extras.identifier = Some(identifier.to_string());
        self
    }

    /// Encryption scope applied to content written with the token.
    pub fn with_encryption_scope(mut self, scope: &str) -> Self {
        self.extras.encryption_scope = Some(scope.to_string());
        self
    }

    /// Override the Cache-Control response header.
    pub fn with_cache_control(mut self, v: &str) -> Self {
        self.extras.cache_control = Some(v.to_string());
        self
    }

    /// Override the Content-Disposition response header.
    pub fn with_content_disposition(mut self, v: &str) -> Self {
        self.extras.content_disposition = Some(v.to_string());
        self
    }

    /// Override the Content-Encoding response header.
    pub fn with_content_encoding(mut self, v: &str) -> Self {
        self.extras.content_encoding = Some(v.to_string());
        self
    }

    /// Override the Content-Language response header.
    pub fn with_content_language(mut self, v: &str) -> Self {
        self.extras.content_language = Some(v.to_string());
        self
    }

    /// Override the Content-Type response header.
    pub fn with_content_type(mut self, v: &str) -> Self {
        self.extras.content_type = Some(v.to_string());
        self
    }

    /// Configured resource.
    pub fn resource(&self) -> Option<&ResourceScope> {
        self.resource.as_ref()
    }

    /// Configured permissions.
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Configured access constraints.
    pub fn constraints(&self) -> &AccessConstraints {
        &self.constraints
    }

    /// Validate the configuration, then sign it.
    ///
    /// Nothing is signed unless every check passes.
    pub fn build(&self, credential: Option<&Credential>) -> Result<SasToken> {
        let Some(credential) = credential else {
            return Err(Error::missing_credential(
                "a shared key credential is required to sign a sas",
            ));
        };
        let resource = self.validate(credential)?;

        let signer = SasSigner::new();
        let string_to_sign =
            signer.string_to_sign(&self.permissions, resource, &self.constraints, &self.extras)?;
        let signature = signer.sign(&string_to_sign, credential);

        let mut params: Vec<(&'static str, String)> = vec![
            (SIGNED_VERSION, signer.version().to_string()),
            (SIGNED_RESOURCE, resource.resource_type_code().to_string()),
        ];
        if let Some(depth) = resource.directory_depth() {
            params.push((SIGNED_DIRECTORY_DEPTH, depth.to_string()));
        }
        if !self.permissions.is_empty() {
            params.push((SIGNED_PERMISSIONS, self.permissions.to_string()));
        }
        push_some(&mut params, SIGNED_START, self.constraints.signed_start());
        push_some(&mut params, SIGNED_EXPIRY, self.constraints.signed_expiry());
        push_some(&mut params, SIGNED_IP, self.constraints.signed_ip());
        push_some(
            &mut params,
            SIGNED_PROTOCOL,
            self.constraints.signed_protocol().map(str::to_string),
        );
        push_some(&mut params, SIGNED_IDENTIFIER, self.extras.identifier.clone());
        push_some(
            &mut params,
            SIGNED_ENCRYPTION_SCOPE,
            self.extras.encryption_scope.clone(),
        );
        push_some(&mut params, CACHE_CONTROL, self.extras.cache_control.clone());
        push_some(
            &mut params,
            CONTENT_DISPOSITION,
            self.extras.content_disposition.clone(),
        );
        push_some(
            &mut params,
            CONTENT_ENCODING,
            self.extras.content_encoding.clone(),
        );
        push_some(
            &mut params,
            CONTENT_LANGUAGE,
            self.extras.content_language.clone(),
        );
        push_some(&mut params, CONTENT_TYPE, self.extras.content_type.clone());
        params.push((SIGNATURE, signature));

        debug!("built service sas for {resource}");

        Ok(SasToken::new(params))
    }

    fn validate(&self, credential: &Credential) -> Result<&ResourceScope> {
        let Some(resource) = &self.resource else {
            return Err(Error::incomplete_configuration(
                "resource is required to build a sas",
            ));
        };

        resource.validate()?;
        if resource.account() != credential.account_name() {
            return Err(Error::invalid_resource_scope(format!(
                "resource account {:?} doesn't match credential account {:?}",
                resource.account(),
                credential.account_name()
            )));
        }

        if self.extras.identifier.as_deref() == Some("") {
            return Err(Error::incomplete_configuration(
                "stored access policy identifier must not be empty",
            ));
        }
        if self.extras.identifier.is_none() {
            if self.constraints.expiry().is_none() {
                return Err(Error::incomplete_configuration(
                    "expiry is required without a stored access policy identifier",
                ));
            }
            if self.permissions.is_empty() {
                return Err(Error::incomplete_configuration(
                    "permissions are required without a stored access policy identifier",
                ));
            }
        }

        self.permissions.validate_for(resource.kind())?;
        self.constraints.validate()?;

        Ok(resource)
    }
}

fn push_some(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(v) = value {
        params.push((key, v));
    }
}
