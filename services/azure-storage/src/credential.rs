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

use std::fmt::{Debug, Formatter};

use sasign_core::hash::{base64_decode, hmac_sha256};
use sasign_core::utils::{Redact, RedactBytes};
use sasign_core::{Error, Result};

/// Shared key credential: the storage account name and its raw signing key.
///
/// The key can't be read back once the credential is built; it is only used
/// through [`Credential::sign`].
#[derive(Clone)]
pub struct Credential {
    account_name: String,
    account_key: Vec<u8>,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account_name", &Redact::from(&self.account_name))
            .field("account_key", &RedactBytes::from(self.account_key.as_slice()))
            .finish()
    }
}

impl Credential {
    /// Create a new credential from raw key bytes.
    pub fn new(account_name: &str, account_key: impl Into<Vec<u8>>) -> Result<Self> {
        let account_key = account_key.into();
        if account_name.is_empty() {
            return Err(Error::credential_invalid("account name must not be empty"));
        }
        if account_key.is_empty() {
            return Err(Error::credential_invalid("account key must not be empty"));
        }

        Ok(Self {
            account_name: account_name.to_string(),
            account_key,
        })
    }

    /// Create a new credential from the base64 account key shown by the portal.
    pub fn from_base64_key(account_name: &str, account_key: &str) -> Result<Self> {
        let key = base64_decode(account_key).map_err(|e| {
            Error::credential_invalid("account key is not valid base64").with_source(e)
        })?;
        Self::new(account_name, key)
    }

    /// Storage account this credential signs for.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// HMAC-SHA256 of `message` keyed with the account key.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        hmac_sha256(&self.account_key, message)
    }
}
