use anyhow::Result;
use pretty_assertions::assert_eq;
use sasign_azure_storage::{
    BlobContainerClient, IpRange, Permission, PermissionSet, Protocol, ResourceScope, SasBuilder,
};
use sasign_core::time::{now, parse_rfc3339};
use sasign_core::ErrorKind;

use super::{emulator_credential, expected_signature, query_get, query_pairs, EMULATOR_KEY};

fn container_client() -> Result<BlobContainerClient> {
    Ok(BlobContainerClient::new(
        "http://127.0.0.1:10000/devstoreaccount1/testing".parse()?,
        Some(emulator_credential()),
    )?)
}

#[test]
fn test_can_generate_container_list_sas() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let client = container_client()?;
    assert!(client.can_generate_sas_uri());

    let uri = client.generate_sas_uri(
        &SasBuilder::new()
            .with_permission(Permission::List)
            .with_expiry(now() + chrono::TimeDelta::minutes(1)),
    )?;

    assert_eq!(uri.path(), "/devstoreaccount1/testing");
    let keys: Vec<_> = query_pairs(&uri).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["sv", "sr", "sp", "se", "sig"]);
    assert_eq!(query_get(&uri, "sr").as_deref(), Some("c"));
    assert_eq!(query_get(&uri, "sp").as_deref(), Some("l"));

    let expiry = query_get(&uri, "se").expect("se must be set");
    let string_to_sign = format!(
        "l\n\n{expiry}\n/blob/devstoreaccount1/testing\n\n\n\n2022-11-02\nc\n\n\n\n\n\n\n"
    );
    assert_eq!(
        query_get(&uri, "sig"),
        Some(expected_signature(EMULATOR_KEY, &string_to_sign))
    );
    Ok(())
}

#[test]
fn test_container_sas_with_constraints() -> Result<()> {
    let builder = SasBuilder::new()
        .with_resource(ResourceScope::container("devstoreaccount1", "testing"))
        .with_permissions("lrw".parse::<PermissionSet>()?)
        .with_start(parse_rfc3339("2024-01-01T00:00:00Z")?)
        .with_expiry(parse_rfc3339("2024-01-01T01:00:00Z")?)
        .with_ip_range("168.1.5.60-168.1.5.70".parse::<IpRange>()?)
        .with_protocol(Protocol::HttpsAndHttp);
    let token = builder.build(Some(&emulator_credential()))?;

    assert_eq!(
        token.to_query_string().split("&sig=").next(),
        Some("sv=2022-11-02&sr=c&sp=rwl&st=2024-01-01T00%3A00%3A00Z&se=2024-01-01T01%3A00%3A00Z&sip=168.1.5.60-168.1.5.70&spr=https%2Chttp")
    );

    let string_to_sign = [
        "rwl",
        "2024-01-01T00:00:00Z",
        "2024-01-01T01:00:00Z",
        "/blob/devstoreaccount1/testing",
        "",
        "168.1.5.60-168.1.5.70",
        "https,http",
        "2022-11-02",
        "c",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    ]
    .join("\n");
    assert_eq!(
        token.get("sig"),
        Some(expected_signature(EMULATOR_KEY, &string_to_sign).as_str())
    );
    Ok(())
}

#[test]
fn test_stored_access_policy_needs_no_expiry() -> Result<()> {
    let token = SasBuilder::new()
        .with_resource(ResourceScope::container("devstoreaccount1", "testing"))
        .with_identifier("read-only-policy")
        .build(Some(&emulator_credential()))?;

    assert_eq!(token.get("si"), Some("read-only-policy"));
    assert_eq!(token.get("se"), None);
    assert_eq!(token.get("sp"), None);
    Ok(())
}

#[test]
fn test_invalid_time_window_produces_no_token() -> Result<()> {
    let t = now();
    let err = container_client()?
        .generate_sas_uri(
            &SasBuilder::new()
                .with_permission(Permission::List)
                .with_start(t)
                .with_expiry(t - chrono::TimeDelta::minutes(1)),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTimeWindow);
    Ok(())
}

#[test]
fn test_invalid_ip_range_produces_no_token() -> Result<()> {
    let err = container_client()?
        .generate_sas_uri(
            &SasBuilder::new()
                .with_permission(Permission::List)
                .with_expiry(now() + chrono::TimeDelta::minutes(1))
                .with_ip_range("10.0.0.5-10.0.0.1".parse()?),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidIpRange);
    Ok(())
}
