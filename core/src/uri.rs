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

use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::Uri;

use crate::Error;
use crate::Result;

/// Editable view over a resource URI.
///
/// Query pairs are kept exactly as they appear on the wire: existing ones are
/// not decoded and new ones must be pushed already percent-encoded. A pair
/// without `=` has no value, `k=` has an empty one, both survive `apply`.
#[derive(Debug, Clone)]
pub struct UriBuilder {
    /// URI scheme.
    pub scheme: Scheme,
    /// URI authority.
    pub authority: Authority,
    /// URI path, percent-encoded.
    pub path: String,
    /// Query pairs, percent-encoded.
    pub query: Vec<(String, Option<String>)>,
}

impl UriBuilder {
    /// Split an absolute URI into its parts.
    pub fn build(uri: &Uri) -> Result<Self> {
        let parts = uri.clone().into_parts();
        let paq = parts
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(UriBuilder {
            scheme: parts.scheme.unwrap_or(Scheme::HTTPS),
            authority: parts
                .authority
                .ok_or_else(|| Error::request_invalid("uri without authority can't carry a sas"))?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    v.split('&')
                        .filter(|pair| !pair.is_empty())
                        .map(|pair| match pair.split_once('=') {
                            Some((k, v)) => (k.to_string(), Some(v.to_string())),
                            None => (pair.to_string(), None),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Reassemble the URI.
    pub fn apply(self) -> Result<Uri> {
        let paq = if self.query.is_empty() {
            self.path
        } else {
            let qs = self.query_string();
            let mut s = self.path;
            s.push('?');
            s.push_str(&qs);
            s
        };

        Ok(Uri::builder()
            .scheme(self.scheme)
            .authority(self.authority)
            .path_and_query(PathAndQuery::from_str(&paq)?)
            .build()?)
    }

    /// Get the last non-empty path segment, percent decoded.
    pub fn last_path_segment(&self) -> Option<String> {
        self.path
            .split('/')
            .rev()
            .find(|v| !v.is_empty())
            .map(|v| {
                percent_encoding::percent_decode_str(v)
                    .decode_utf8_lossy()
                    .into_owned()
            })
    }

    /// Append an already encoded segment to the path.
    pub fn path_push(&mut self, segment: &str) {
        if !self.path.ends_with('/') {
            self.path.push('/');
        }
        self.path.push_str(segment.trim_start_matches('/'));
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.as_ref().map_or(0, |v| v.len() + 1))
            .sum::<usize>()
            + self.query.len().saturating_sub(1)
    }

    /// Render the raw query, without the leading `?`.
    pub fn query_string(&self) -> String {
        let mut s = String::with_capacity(self.query_size());
        for (i, (k, v)) in self.query.iter().enumerate() {
            if i > 0 {
                s.push('&');
            }

            s.push_str(k);
            if let Some(v) = v {
                s.push('=');
                s.push_str(v);
            }
        }
        s
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), Some(value.into())));
    }

    /// Get the decoded value of the first pair whose decoded key is `key`.
    pub fn query_get(&self, key: &str) -> Option<String> {
        form_urlencoded::parse(self.query_string().as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_and_apply_keeps_uri() {
        let uri: Uri = "https://acc.blob.core.windows.net/c/a%20b?comp=list&restype=container"
            .parse()
            .unwrap();
        let builder = UriBuilder::build(&uri).unwrap();
        assert_eq!(builder.path, "/c/a%20b");
        assert_eq!(builder.query_get("comp").as_deref(), Some("list"));
        assert_eq!(builder.apply().unwrap(), uri);
    }

    #[test]
    fn test_query_push() {
        let uri: Uri = "http://127.0.0.1:10000/devstoreaccount1/testing"
            .parse()
            .unwrap();
        let mut builder = UriBuilder::build(&uri).unwrap();
        builder.query_push("sv", "2022-11-02");
        builder.query_push("sig", "a%2Bb");
        assert_eq!(
            builder.apply().unwrap().to_string(),
            "http://127.0.0.1:10000/devstoreaccount1/testing?sv=2022-11-02&sig=a%2Bb"
        );
    }

    #[test]
    fn test_path_push() {
        let uri: Uri = "https://acc.blob.core.windows.net/".parse().unwrap();
        let mut builder = UriBuilder::build(&uri).unwrap();
        builder.path_push("container");
        builder.path_push("some/file.txt");
        assert_eq!(builder.path, "/container/some/file.txt");
        assert_eq!(builder.last_path_segment(), Some("file.txt".to_string()));
    }

    #[test]
    fn test_relative_uri_is_rejected() {
        let uri: Uri = "/container/blob".parse().unwrap();
        let err = UriBuilder::build(&uri).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_empty_values_round_trip() {
        let uri: Uri = "https://acc.blob.core.windows.net/c?a=&b=1&flag".parse().unwrap();
        let builder = UriBuilder::build(&uri).unwrap();
        assert_eq!(builder.query_get("a").as_deref(), Some(""));
        assert_eq!(builder.query_get("flag").as_deref(), Some(""));
        assert_eq!(builder.query_size(), "a=&b=1&flag".len());
        assert_eq!(
            builder.apply().unwrap().to_string(),
            "https://acc.blob.core.windows.net/c?a=&b=1&flag"
        );

        let mut builder = UriBuilder::build(&uri).unwrap();
        builder.query.clear();
        builder.query_push("rscc", "");
        assert_eq!(
            builder.apply().unwrap().to_string(),
            "https://acc.blob.core.windows.net/c?rscc="
        );
    }

    #[test]
    fn test_query_get_decodes_keys_and_values() {
        let uri: Uri = "https://acc.blob.core.windows.net/c?si%67=a%2Bb".parse().unwrap();
        let builder = UriBuilder::build(&uri).unwrap();
        assert_eq!(builder.query_get("sig").as_deref(), Some("a+b"));
    }
}
