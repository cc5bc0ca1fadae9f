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

use std::fmt::{self, Debug, Display, Formatter};

use http::Uri;
use log::debug;
use percent_encoding::utf8_percent_encode;
use sasign_core::utils::Redact;
use sasign_core::{Error, Result, UriBuilder};

use crate::constants::{AZURE_QUERY_ENCODE_SET, SIGNATURE};

/// A signed SAS token: the ordered query parameters to append to a resource
/// URI.
///
/// Values are kept raw. They are percent-encoded only when rendered as a
/// query string or appended to a URI.
#[derive(Clone, PartialEq, Eq)]
pub struct SasToken {
    params: Vec<(&'static str, String)>,
}

impl SasToken {
    pub(crate) fn new(params: Vec<(&'static str, String)>) -> Self {
        Self { params }
    }

    /// Get the raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(name, raw value)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the token has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as `k=v&k=v`, values percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.encoded()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append the token to `uri`, keeping its path and existing query.
    pub fn append_to(&self, uri: &Uri) -> Result<Uri> {
        let mut builder = UriBuilder::build(uri)?;
        if builder.query_get(SIGNATURE).is_some() {
            return Err(Error::request_invalid(
                "uri already carries a shared access signature",
            ));
        }

        for (k, v) in self.encoded() {
            builder.query_push(k, v);
        }

        let uri = builder.apply()?;
        debug!("appended {} sas parameters to {}", self.len(), uri.path());
        Ok(uri)
    }

    fn encoded(&self) -> impl Iterator<Item = (&str, String)> {
        self.params.iter().map(|(k, v)| {
            (
                *k,
                utf8_percent_encode(v, &AZURE_QUERY_ENCODE_SET).to_string(),
            )
        })
    }
}

impl Debug for SasToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for (k, v) in &self.params {
            if *k == SIGNATURE {
                m.entry(k, &Redact::from(v));
            } else {
                m.entry(k, v);
            }
        }
        m.finish()
    }
}

impl Display for SasToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
