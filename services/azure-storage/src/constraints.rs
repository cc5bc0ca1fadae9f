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
use std::net::IpAddr;
use std::str::FromStr;

use sasign_core::time::{format_sas_time, truncate_to_seconds, DateTime};
use sasign_core::{Error, Result};

/// Specifies the protocol permitted for a request made with the SAS.
///
/// - [Specify the HTTP protocol](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas#specify-the-http-protocol)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Only requests over HTTPS are accepted.
    HttpsOnly,
    /// Requests over HTTPS or HTTP are accepted.
    HttpsAndHttp,
}

impl Protocol {
    /// Value of the signed protocol (`spr`) field.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::HttpsOnly => "https",
            Protocol::HttpsAndHttp => "https,http",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "https" => Ok(Protocol::HttpsOnly),
            "https,http" => Ok(Protocol::HttpsAndHttp),
            v => Err(Error::config_invalid(format!("unknown sas protocol {v:?}"))),
        }
    }
}

/// IP address or inclusive range of addresses a SAS may be used from.
///
/// The text form is `start` or `start-end`, used as is for both the string
/// to sign and the `sip` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRange {
    start: IpAddr,
    end: Option<IpAddr>,
}

impl IpRange {
    /// Create a range, it's checked by [`IpRange::validate`].
    pub fn new(start: IpAddr, end: Option<IpAddr>) -> Self {
        Self { start, end }
    }

    /// Create a range of exactly one address.
    pub fn single(ip: IpAddr) -> Self {
        Self::new(ip, None)
    }

    /// First allowed address.
    pub fn start(&self) -> IpAddr {
        self.start
    }

    /// Last allowed address, if this is a range.
    pub fn end(&self) -> Option<IpAddr> {
        self.end
    }

    /// Check that both ends share an address family and `end >= start`.
    pub fn validate(&self) -> Result<()> {
        let Some(end) = self.end else {
            return Ok(());
        };

        if self.start.is_ipv4() != end.is_ipv4() {
            return Err(Error::invalid_ip_range(format!(
                "ip range {self} mixes address families"
            )));
        }
        if end < self.start {
            return Err(Error::invalid_ip_range(format!(
                "ip range {self} ends before it starts"
            )));
        }
        Ok(())
    }
}

impl From<IpAddr> for IpRange {
    fn from(ip: IpAddr) -> Self {
        Self::single(ip)
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            None => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{}", self.start, end),
        }
    }
}

impl FromStr for IpRange {
    type Err = Error;

    /// Parse `start` or `start-end`.
    ///
    /// Only the syntax is checked here, ordering is left to `validate`.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |v: &str| {
            v.trim().parse::<IpAddr>().map_err(|e| {
                Error::invalid_ip_range(format!("invalid ip address {v:?}")).with_source(e)
            })
        };

        match s.split_once('-') {
            None => Ok(Self::single(parse(s)?)),
            Some((start, end)) => Ok(Self::new(parse(start)?, Some(parse(end)?))),
        }
    }
}

/// Restrictions on when, from where and how a SAS may be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessConstraints {
    start: Option<DateTime>,
    expiry: Option<DateTime>,
    ip_range: Option<IpRange>,
    protocol: Option<Protocol>,
}

impl AccessConstraints {
    /// Create constraints without any restriction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time the SAS becomes valid.
    pub fn with_start(mut self, start: DateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the time the SAS becomes invalid.
    pub fn with_expiry(mut self, expiry: DateTime) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Set the allowed ip range.
    pub fn with_ip_range(mut self, ip_range: IpRange) -> Self {
        self.ip_range = Some(ip_range);
        self
    }

    /// Set the allowed protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Start time.
    pub fn start(&self) -> Option<DateTime> {
        self.start
    }

    /// Expiry time.
    pub fn expiry(&self) -> Option<DateTime> {
        self.expiry
    }

    /// Allowed ip range.
    pub fn ip_range(&self) -> Option<&IpRange> {
        self.ip_range.as_ref()
    }

    /// Allowed protocol.
    pub fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    /// Check the time window and the ip range.
    ///
    /// Times are compared at the precision they get signed with, so two
    /// instants within the same second are an empty window.
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(expiry)) = (self.start, self.expiry) {
            if truncate_to_seconds(start) >= truncate_to_seconds(expiry) {
                return Err(Error::invalid_time_window(format!(
                    "start {} must be before expiry {}",
                    format_sas_time(start),
                    format_sas_time(expiry)
                )));
            }
        }

        if let Some(ip_range) = &self.ip_range {
            ip_range.validate()?;
        }

        Ok(())
    }

    /// Formatted signed start (`st`).
    pub fn signed_start(&self) -> Option<String> {
        self.start.map(format_sas_time)
    }

    /// Formatted signed expiry (`se`).
    pub fn signed_expiry(&self) -> Option<String> {
        self.expiry.map(format_sas_time)
    }

    /// Formatted signed ip (`sip`).
    pub fn signed_ip(&self) -> Option<String> {
        self.ip_range.map(|v| v.to_string())
    }

    /// Formatted signed protocol (`spr`).
    pub fn signed_protocol(&self) -> Option<&'static str> {
        self.protocol.map(Protocol::as_str)
    }
}
