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

use std::collections::HashMap;
use std::env;
use std::fmt::{Debug, Formatter};

use sasign_core::utils::Redact;
use sasign_core::{Error, Result};

use crate::constants::*;
use crate::Credential;

/// Config carries the account settings used to sign SAS tokens.
#[derive(Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Config {
    /// `account_name` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AZBLOB_ACCOUNT_NAME`
    pub account_name: Option<String>,
    /// `account_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AZBLOB_ACCOUNT_KEY`
    ///
    /// The key is base64 encoded, as shown by the portal.
    pub account_key: Option<String>,
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `AZBLOB_ENDPOINT`
    ///
    /// Defaults to `https://<account_name>.blob.core.windows.net`.
    pub endpoint: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Config {
    /// Load config from env.
    ///
    /// Fields that are already set are overwritten by the env.
    pub fn from_env(mut self) -> Self {
        let envs = env::vars().collect::<HashMap<_, _>>();

        if let Some(v) = envs.get(AZBLOB_ACCOUNT_NAME) {
            self.account_name = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZBLOB_ACCOUNT_KEY) {
            self.account_key = Some(v.to_string());
        }

        if let Some(v) = envs.get(AZBLOB_ENDPOINT) {
            self.endpoint = Some(v.to_string());
        }

        self
    }

    /// Set the account name.
    pub fn with_account_name(mut self, account_name: &str) -> Self {
        self.account_name = Some(account_name.to_string());
        self
    }

    /// Set the base64 encoded account key.
    pub fn with_account_key(mut self, account_key: &str) -> Self {
        self.account_key = Some(account_key.to_string());
        self
    }

    /// Set the blob service endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Build the shared key credential.
    ///
    /// Returns `None` when neither account name nor key is configured, which
    /// is a valid url only setup.
    pub fn credential(&self) -> Result<Option<Credential>> {
        match (&self.account_name, &self.account_key) {
            (Some(name), Some(key)) => Credential::from_base64_key(name, key).map(Some),
            (None, None) => Ok(None),
            (Some(_), None) => Err(Error::config_invalid(
                "account_name is set but account_key is missing",
            )),
            (None, Some(_)) => Err(Error::config_invalid(
                "account_key is set but account_name is missing",
            )),
        }
    }

    /// Resolve the blob service endpoint.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }

        match &self.account_name {
            Some(name) => Ok(format!("https://{name}.blob.core.windows.net")),
            None => Err(Error::config_invalid(
                "either endpoint or account_name must be configured",
            )),
        }
    }
}
