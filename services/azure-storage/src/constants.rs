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

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Service version signed into every SAS.
///
/// - [Versioning for Azure Storage](https://learn.microsoft.com/en-us/rest/api/storageservices/versioning-for-the-azure-storage-services)
pub const SAS_VERSION: &str = "2022-11-02";

/// First version whose string to sign carries the encryption scope line.
pub const ENCRYPTION_SCOPE_VERSION: &str = "2020-12-06";

// Query parameters of a SAS token.
pub const SIGNED_VERSION: &str = "sv";
pub const SIGNED_RESOURCE: &str = "sr";
pub const SIGNED_DIRECTORY_DEPTH: &str = "sdd";
pub const SIGNED_PERMISSIONS: &str = "sp";
pub const SIGNED_START: &str = "st";
pub const SIGNED_EXPIRY: &str = "se";
pub const SIGNED_IP: &str = "sip";
pub const SIGNED_PROTOCOL: &str = "spr";
pub const SIGNED_IDENTIFIER: &str = "si";
pub const SIGNED_ENCRYPTION_SCOPE: &str = "ses";
pub const SIGNED_SERVICES: &str = "ss";
pub const SIGNED_RESOURCE_TYPES: &str = "srt";
pub const CACHE_CONTROL: &str = "rscc";
pub const CONTENT_DISPOSITION: &str = "rscd";
pub const CONTENT_ENCODING: &str = "rsce";
pub const CONTENT_LANGUAGE: &str = "rscl";
pub const CONTENT_TYPE: &str = "rsct";
pub const SIGNATURE: &str = "sig";

// Query parameters addressing a specific blob snapshot or version.
pub const SNAPSHOT: &str = "snapshot";
pub const VERSION_ID: &str = "versionid";

// Env values used to configure clients.
pub const AZBLOB_ENDPOINT: &str = "AZBLOB_ENDPOINT";
pub const AZBLOB_ACCOUNT_KEY: &str = "AZBLOB_ACCOUNT_KEY";
pub const AZBLOB_ACCOUNT_NAME: &str = "AZBLOB_ACCOUNT_NAME";

/// Everything except alphanumerics and `-._~/` is percent-encoded.
pub static AZURE_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'/')
    .remove(b'~');
