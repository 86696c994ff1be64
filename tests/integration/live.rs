//! Engine integration tests against a live org.

use std::sync::Arc;

use super::common::{get_config, logged_in_manager};
use busbar_sf_engine::ErrorKind;
use serde_json::json;

#[tokio::test]
#[ignore = "requires a Salesforce org"]
async fn test_login_is_memoized() {
    let manager = logged_in_manager().await;
    let credentials = get_config().credentials().cloned().unwrap();

    let first = manager.login(credentials.clone()).await.unwrap();
    let second = manager.login(credentials).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let url = manager.login_url().await.unwrap();
    assert!(url.starts_with(first.instance_url()));
    assert!(url.contains("/secur/frontdoor.jsp?sid="));
}

#[tokio::test]
#[ignore = "requires a Salesforce org"]
async fn test_describe_account() {
    let manager = logged_in_manager().await;

    let objects = manager.all_objects().await.unwrap();
    assert!(objects.iter().any(|o| o.name == "Account"));

    let fields = manager.all_fields("Account").await.unwrap();
    assert!(fields.iter().any(|f| f.name == "Name"));

    let describe = manager.describe_object("Account").await.unwrap();
    assert_eq!(describe.name, "Account");
    assert!(Arc::ptr_eq(
        &describe,
        &manager.describe_object("Account").await.unwrap()
    ));
}

#[tokio::test]
#[ignore = "requires a Salesforce org"]
async fn test_account_lifecycle() {
    let manager = logged_in_manager().await;
    let name = format!(
        "BusbarEngineTest {}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis()
    );

    let inserted = manager
        .insert(&[json!({"Name": name})], "Account")
        .await
        .expect("insert should succeed");
    let id = inserted[0].id.clone().expect("created record has an id");

    manager
        .update(&[json!({"Id": id, "Description": "updated"})], "Account")
        .await
        .expect("update should succeed");

    let found = manager
        .query(&format!("SELECT Id, Description FROM Account WHERE Id = '{}'", id))
        .await
        .unwrap();
    assert_eq!(found.total_size, 1);
    assert_eq!(found.records[0]["Description"], "updated");

    manager
        .delete(&[id], "Account")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
#[ignore = "requires a Salesforce org"]
async fn test_insert_missing_required_field_fails() {
    let manager = logged_in_manager().await;

    let err = manager
        .insert(&[json!({"Description": "no name"})], "Account")
        .await
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SaveFailed { .. }));
}
