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

//! Time related utils.

use chrono::SubsecRound;
use chrono::Utc;

use crate::Error;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// SAS time format: "2022-03-01T08:12:34Z"
///
/// Subseconds are never written.
const SAS_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Create date time for now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Drop the subsecond part so the instant matches what gets signed.
pub fn truncate_to_seconds(t: DateTime) -> DateTime {
    t.trunc_subsecs(0)
}

/// Format time into the fixed SAS format: "2022-03-01T08:12:34Z"
pub fn format_sas_time(t: DateTime) -> String {
    t.format(SAS_TIME_FORMAT).to_string()
}

/// Parse time from RFC3339.
///
/// All offsets are converted into UTC.
pub fn parse_rfc3339(s: &str) -> crate::Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|e| Error::unexpected(format!("invalid rfc3339 time: {s}")).with_source(e))
}
