use anyhow::Result;
use pretty_assertions::assert_eq;
use sasign_azure_storage::{
    AccountResourceTypes, AccountSasBuilder, AccountServices, BlobServiceClient, Credential,
};
use sasign_core::time::parse_rfc3339;
use sasign_core::ErrorKind;

use super::{emulator_credential, expected_signature, query_get, EMULATOR_KEY};

#[test]
fn test_account_sas_uri() -> Result<()> {
    let service = BlobServiceClient::new(
        "https://devstoreaccount1.blob.core.windows.net".parse()?,
        Some(emulator_credential()),
    );
    let builder = AccountSasBuilder::new()
        .with_services("b".parse::<AccountServices>()?)
        .with_resource_types(AccountResourceTypes::all())
        .with_permissions("rl".parse()?)
        .with_expiry(parse_rfc3339("2030-06-01T12:00:00Z")?);

    let uri = service.generate_account_sas_uri(&builder)?;
    assert_eq!(query_get(&uri, "ss").as_deref(), Some("b"));
    assert_eq!(query_get(&uri, "srt").as_deref(), Some("sco"));
    assert_eq!(query_get(&uri, "sp").as_deref(), Some("rl"));

    let string_to_sign = "devstoreaccount1\nrl\nb\nsco\n\n2030-06-01T12:00:00Z\n\n\n2022-11-02\n\n";
    assert_eq!(
        query_get(&uri, "sig"),
        Some(expected_signature(EMULATOR_KEY, string_to_sign))
    );
    Ok(())
}

#[test]
fn test_account_sas_pinned_signature() -> Result<()> {
    let credential = Credential::from_base64_key("account", "a2V5")?;
    let token = AccountSasBuilder::new()
        .with_version("2018-11-09")
        .with_services(AccountServices::all())
        .with_resource_types(AccountResourceTypes::all())
        .with_permissions("rwdlacu".parse()?)
        .with_expiry(parse_rfc3339("2022-03-01T08:17:34Z")?)
        .build(Some(&credential))?;

    assert_eq!(
        token.get("sig"),
        Some("jgK9nDUT0ntH/p28LPs0jzwxsk91W6hePLPlfrElv4k=")
    );
    Ok(())
}

#[test]
fn test_account_sas_without_credential() -> Result<()> {
    let service =
        BlobServiceClient::new("https://devstoreaccount1.blob.core.windows.net".parse()?, None);
    let err = service
        .generate_account_sas_uri(
            &AccountSasBuilder::new()
                .with_services(AccountServices::all())
                .with_resource_types(AccountResourceTypes::all())
                .with_permissions("r".parse()?)
                .with_expiry(parse_rfc3339("2030-06-01T12:00:00Z")?),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredential);
    Ok(())
}
