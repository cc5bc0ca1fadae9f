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
use thiserror::Error;

/// The error type for SAS construction.
///
/// Every error is a local validation failure raised before any signature is
/// produced. None of them are transient, so none should be retried.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A permission is unknown or not supported by the target resource.
    InvalidPermission,

    /// The resource path doesn't match its scope.
    InvalidResourceScope,

    /// Start time is not strictly before expiry time.
    InvalidTimeWindow,

    /// IP range is unparsable, mixes address families or ends before it starts.
    InvalidIpRange,

    /// No signing key is available.
    MissingCredential,

    /// The token would be unusable (no expiry and no stored access policy, etc.)
    IncompleteConfiguration,

    /// Credentials exist but are invalid/malformed
    CredentialInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// The URI a token should be attached to can't be used.
    RequestInvalid,

    /// Unexpected errors
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this error was caused by the caller's SAS configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidPermission
                | ErrorKind::InvalidResourceScope
                | ErrorKind::InvalidTimeWindow
                | ErrorKind::InvalidIpRange
                | ErrorKind::IncompleteConfiguration
        )
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid permission error
    pub fn invalid_permission(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPermission, message)
    }

    /// Create an invalid resource scope error
    pub fn invalid_resource_scope(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidResourceScope, message)
    }

    /// Create an invalid time window error
    pub fn invalid_time_window(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTimeWindow, message)
    }

    /// Create an invalid ip range error
    pub fn invalid_ip_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidIpRange, message)
    }

    /// Create a missing credential error
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingCredential, message)
    }

    /// Create an incomplete configuration error
    pub fn incomplete_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompleteConfiguration, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidPermission => write!(f, "invalid permission"),
            ErrorKind::InvalidResourceScope => write!(f, "invalid resource scope"),
            ErrorKind::InvalidTimeWindow => write!(f, "invalid time window"),
            ErrorKind::InvalidIpRange => write!(f, "invalid ip range"),
            ErrorKind::MissingCredential => write!(f, "missing credential"),
            ErrorKind::IncompleteConfiguration => write!(f, "incomplete configuration"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
