use anyhow::Result;
use pretty_assertions::assert_eq;
use sasign_azure_storage::{
    BlobContainerClient, Permission, PermissionSet, Protocol, ResourceScope, SasBuilder,
};
use sasign_core::time::parse_rfc3339;
use sasign_core::ErrorKind;

use super::{emulator_credential, expected_signature, query_get, EMULATOR_KEY};

fn expiry() -> sasign_core::time::DateTime {
    parse_rfc3339("2030-06-01T12:00:00Z").expect("valid time")
}

#[test]
fn test_blob_sas_without_credential() -> Result<()> {
    let builder = SasBuilder::new()
        .with_resource(ResourceScope::blob("devstoreaccount1", "testing", "some/file.txt"))
        .with_permission(Permission::Read)
        .with_expiry(expiry());

    let err = builder.build(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredential);

    let client = BlobContainerClient::new(
        "http://127.0.0.1:10000/devstoreaccount1/testing".parse()?,
        None,
    )?
    .blob_client("some/file.txt")?;
    let err = client.generate_sas_uri(&builder).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingCredential);
    Ok(())
}

#[test]
fn test_setter_order_does_not_change_token() -> Result<()> {
    let resource = ResourceScope::blob("devstoreaccount1", "testing", "some/file.txt");

    let a = SasBuilder::new()
        .with_resource(resource.clone())
        .with_permission(Permission::Write)
        .with_permission(Permission::Read)
        .with_protocol(Protocol::HttpsOnly)
        .with_expiry(expiry())
        .with_content_type("text/plain")
        .build(Some(&emulator_credential()))?;
    let b = SasBuilder::new()
        .with_content_type("text/plain")
        .with_expiry(expiry())
        .with_protocol(Protocol::HttpsOnly)
        .with_permissions("rw".parse::<PermissionSet>()?)
        .with_resource(resource)
        .build(Some(&emulator_credential()))?;

    assert_eq!(a.to_query_string(), b.to_query_string());
    assert_eq!(a.get("sp"), Some("rw"));
    Ok(())
}

#[test]
fn test_full_permission_set_is_canonical() -> Result<()> {
    let all: PermissionSet = "poiemtyxdwcar".parse()?;
    let token = SasBuilder::new()
        .with_resource(ResourceScope::blob("devstoreaccount1", "testing", "file.txt"))
        .with_permissions(all)
        .with_expiry(expiry())
        .build(Some(&emulator_credential()))?;
    assert_eq!(token.get("sp"), Some("racwdxytmeiop"));
    Ok(())
}

#[test]
fn test_unsupported_permission_is_rejected() {
    let err = SasBuilder::new()
        .with_resource(ResourceScope::blob("devstoreaccount1", "testing", "file.txt"))
        .with_permission(Permission::List)
        .with_expiry(expiry())
        .build(Some(&emulator_credential()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPermission);
}

#[test]
fn test_response_header_overrides_are_signed() -> Result<()> {
    let token = SasBuilder::new()
        .with_resource(ResourceScope::blob("devstoreaccount1", "testing", "report.pdf"))
        .with_permission(Permission::Read)
        .with_expiry(expiry())
        .with_cache_control("no-cache")
        .with_content_disposition("attachment; filename=report.pdf")
        .with_content_type("application/pdf")
        .build(Some(&emulator_credential()))?;

    assert_eq!(
        token.to_query_string().split("&sig=").next(),
        Some("sv=2022-11-02&sr=b&sp=r&se=2030-06-01T12%3A00%3A00Z&rscc=no-cache&rscd=attachment%3B%20filename%3Dreport.pdf&rsct=application/pdf")
    );

    let string_to_sign = [
        "r",
        "",
        "2030-06-01T12:00:00Z",
        "/blob/devstoreaccount1/testing/report.pdf",
        "",
        "",
        "",
        "2022-11-02",
        "b",
        "",
        "",
        "no-cache",
        "attachment; filename=report.pdf",
        "",
        "",
        "application/pdf",
    ]
    .join("\n");
    assert_eq!(
        token.get("sig"),
        Some(expected_signature(EMULATOR_KEY, &string_to_sign).as_str())
    );
    Ok(())
}

#[test]
fn test_directory_sas_carries_depth() -> Result<()> {
    let token = SasBuilder::new()
        .with_resource(ResourceScope::directory("devstoreaccount1", "testing", "a/b/c"))
        .with_permissions("rl".parse::<PermissionSet>()?)
        .with_expiry(expiry())
        .build(Some(&emulator_credential()))?;

    assert_eq!(token.get("sr"), Some("d"));
    assert_eq!(token.get("sdd"), Some("3"));
    Ok(())
}

#[test]
fn test_snapshot_sas_uri() -> Result<()> {
    let snapshot = "2024-01-01T00:00:00.0000000Z";
    let blob = BlobContainerClient::new(
        "http://127.0.0.1:10000/devstoreaccount1/testing".parse()?,
        Some(emulator_credential()),
    )?
    .blob_client("file.txt")?
    .with_snapshot(snapshot);

    let uri = blob.generate_sas_uri(
        &SasBuilder::new()
            .with_permission(Permission::Read)
            .with_expiry(expiry()),
    )?;

    assert_eq!(query_get(&uri, "snapshot").as_deref(), Some(snapshot));
    assert_eq!(query_get(&uri, "sr").as_deref(), Some("bs"));

    let string_to_sign = format!(
        "r\n\n2030-06-01T12:00:00Z\n/blob/devstoreaccount1/testing/file.txt\n\n\n\n2022-11-02\nbs\n{snapshot}\n\n\n\n\n\n"
    );
    assert_eq!(
        query_get(&uri, "sig"),
        Some(expected_signature(EMULATOR_KEY, &string_to_sign))
    );
    Ok(())
}

#[test]
fn test_signature_is_deterministic() -> Result<()> {
    let builder = SasBuilder::new()
        .with_resource(ResourceScope::blob_version(
            "devstoreaccount1",
            "testing",
            "file.txt",
            "2024-01-01T00:00:00.0000000Z",
        ))
        .with_permission(Permission::Delete)
        .with_expiry(expiry());

    let first = builder.build(Some(&emulator_credential()))?;
    let second = builder.build(Some(&emulator_credential()))?;
    assert_eq!(first, second);
    assert_eq!(first.get("sr"), Some("bv"));
    Ok(())
}
