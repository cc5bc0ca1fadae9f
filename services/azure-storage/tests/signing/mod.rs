mod account_sas;
mod blob_sas;
mod container_sas;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use http::Uri;
use sasign_azure_storage::Credential;
use sha2::Sha256;

/// Well known key of the local storage emulator.
pub const EMULATOR_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
pub const EMULATOR_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

pub fn emulator_credential() -> Credential {
    Credential::from_base64_key("devstoreaccount1", EMULATOR_KEY).expect("emulator key is valid")
}

/// Decoded query pairs, in order.
pub fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    form_urlencoded::parse(uri.query().unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

pub fn query_get(uri: &Uri, key: &str) -> Option<String> {
    query_pairs(uri)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

/// Signature computed without going through the crate.
pub fn expected_signature(key: &str, string_to_sign: &str) -> String {
    let key = STANDARD.decode(key).expect("key must be base64");
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).expect("hmac accepts any key size");
    mac.update(string_to_sign.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
