//! SessionManager behavior against an in-memory provider.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use busbar_sf_engine::{
    keys, Cache, ErrorKind, LoginEnvironment, SessionManager, UserCredentials,
};
use serde_json::json;

use super::common::{user_id_for, CountingProvider, INSTANCE_URL};

fn manager() -> SessionManager<CountingProvider> {
    SessionManager::new("production", CountingProvider::new(), Cache::new())
        .expect("production is a valid environment")
}

fn creds(username: &str, password: &str) -> UserCredentials {
    UserCredentials::new(username, password)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_environment_is_case_insensitive() {
    let production = SessionManager::new("Production", CountingProvider::new(), Cache::new())
        .expect("mixed case production");
    assert_eq!(production.environment(), LoginEnvironment::Production);
    assert_eq!(production.login_endpoint(), "https://login.salesforce.com");

    let sandbox = SessionManager::new("SANDBOX", CountingProvider::new(), Cache::new())
        .expect("upper case sandbox");
    assert_eq!(sandbox.login_endpoint(), "https://test.salesforce.com");
}

#[test]
fn test_unknown_environment_is_rejected() {
    for environment in ["staging", "", "prod", "sandbox "] {
        let err = SessionManager::new(environment, CountingProvider::new(), Cache::new())
            .unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidConfiguration(_)),
            "'{}' should be rejected",
            environment
        );
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_connects_once_per_username() {
    let manager = manager();

    let first = manager.login(creds("alice@example.com", "pw")).await.unwrap();
    let second = manager.login(creds("alice@example.com", "pw")).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(CountingProvider::count(&manager.provider().connects), 1);
    assert_eq!(first.server_url(), Some("https://login.salesforce.com"));
}

#[tokio::test]
async fn test_login_reuses_session_despite_wrong_password() {
    let manager = manager();

    let good = manager.login(creds("alice@example.com", "pw")).await.unwrap();
    let wrong = manager
        .login(creds("alice@example.com", "WRONG"))
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&good, &wrong));
    assert_eq!(CountingProvider::count(&manager.provider().connects), 1);
    // the latest credential is still the one made current
    assert_eq!(manager.current_credentials().unwrap().password(), "WRONG");
}

#[tokio::test]
async fn test_distinct_usernames_get_distinct_sessions() {
    let manager = manager();

    let alice = manager.login(creds("alice@example.com", "pw")).await.unwrap();
    let bob = manager.login(creds("bob@example.com", "pw")).await.unwrap();

    assert!(!Arc::ptr_eq(&alice, &bob));
    assert_eq!(CountingProvider::count(&manager.provider().connects), 2);
    assert_eq!(
        manager.current_credentials().unwrap().username(),
        "bob@example.com"
    );
}

#[tokio::test]
async fn test_concurrent_first_logins_share_one_connect() {
    let manager = SessionManager::new(
        "sandbox",
        CountingProvider::with_connect_delay(Duration::from_millis(20)),
        Cache::new(),
    )
    .unwrap();

    let (a, b, c) = tokio::join!(
        manager.login(creds("alice@example.com", "pw")),
        manager.login(creds("alice@example.com", "pw")),
        manager.login(creds("alice@example.com", "pw")),
    );

    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
    assert_eq!(CountingProvider::count(&manager.provider().connects), 1);
}

#[tokio::test]
async fn test_failed_login_is_returned_and_not_cached() {
    let manager = manager();
    manager.provider().fail_connect.store(true, Ordering::SeqCst);

    let err = manager
        .login(creds("alice@example.com", "pw"))
        .await
        .unwrap_err();
    assert!(err.is_provider_error());
    assert!(!manager.cache().has(&keys::connection("alice@example.com")));
    // the credential is current even though the login failed
    assert!(manager.cache().has(keys::CURRENT_CREDENTIALS));

    manager.provider().fail_connect.store(false, Ordering::SeqCst);
    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    assert_eq!(CountingProvider::count(&manager.provider().connects), 2);
}

#[tokio::test]
async fn test_logout_forces_a_new_connect() {
    let manager = manager();

    let before = manager.login(creds("alice@example.com", "pw")).await.unwrap();
    assert!(manager.logout("alice@example.com"));
    assert!(manager.current_credentials().is_none());
    assert!(!manager.logout("alice@example.com"));

    let after = manager.login(creds("alice@example.com", "pw")).await.unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(CountingProvider::count(&manager.provider().connects), 2);
}

#[tokio::test]
async fn test_logout_of_other_user_keeps_current_credentials() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    manager.login(creds("bob@example.com", "pw")).await.unwrap();

    assert!(manager.logout("alice@example.com"));
    assert_eq!(
        manager.current_credentials().unwrap().username(),
        "bob@example.com"
    );
}

#[tokio::test]
async fn test_managers_sharing_a_cache_share_sessions() {
    let cache = Cache::new();
    let first = SessionManager::new("production", CountingProvider::new(), cache.clone()).unwrap();
    let second = SessionManager::new("production", CountingProvider::new(), cache).unwrap();

    let a = first.login(creds("alice@example.com", "pw")).await.unwrap();
    let b = second.login(creds("alice@example.com", "pw")).await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(CountingProvider::count(&second.provider().connects), 0);
}

// ============================================================================
// Login URL
// ============================================================================

#[tokio::test]
async fn test_login_url_requires_login() {
    let manager = manager();
    let err = manager.login_url().await.unwrap_err();
    assert!(err.is_unauthenticated());
    assert_eq!(CountingProvider::count(&manager.provider().connects), 0);
}

#[tokio::test]
async fn test_login_url_uses_current_session() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();

    let url = manager.login_url().await.unwrap();
    assert_eq!(
        url,
        format!("{}/secur/frontdoor.jsp?sid=00Dxx!session1", INSTANCE_URL)
    );
    assert_eq!(CountingProvider::count(&manager.provider().connects), 1);
}

// ============================================================================
// Describe memoization
// ============================================================================

#[tokio::test]
async fn test_all_objects_is_memoized_per_user() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();

    let first = manager.all_objects().await.unwrap();
    let second = manager.all_objects().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "Account");
    assert_eq!(CountingProvider::count(&manager.provider().describe_globals), 1);
    assert!(manager
        .cache()
        .has(&keys::object_list(&user_id_for("alice@example.com"))));
}

#[tokio::test]
async fn test_describe_cache_is_per_user() {
    let manager = manager();
    let alice = user_id_for("alice@example.com");
    let bob = user_id_for("bob@example.com");

    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    manager.all_objects().await.unwrap();
    manager.describe_object("Account").await.unwrap();

    manager.login(creds("bob@example.com", "pw")).await.unwrap();
    manager.all_objects().await.unwrap();
    manager.describe_object("Account").await.unwrap();
    manager.all_objects().await.unwrap();

    assert_eq!(CountingProvider::count(&manager.provider().describe_globals), 2);
    assert_eq!(CountingProvider::count(&manager.provider().describes), 2);
    assert!(manager.cache().has(&keys::object_list(&alice)));
    assert!(manager.cache().has(&keys::object_list(&bob)));
    assert!(manager.cache().has(&keys::object_info("Account", &alice)));
    assert!(manager.cache().has(&keys::object_info("Account", &bob)));

    // switching back to alice reuses her cached describe
    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    manager.all_objects().await.unwrap();
    assert_eq!(CountingProvider::count(&manager.provider().describe_globals), 2);
}

#[tokio::test]
async fn test_failed_describe_is_not_cached() {
    let manager = manager();
    let user_id = user_id_for("alice@example.com");
    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    manager.provider().fail_describe.store(true, Ordering::SeqCst);

    let err = manager.all_objects().await.unwrap_err();
    assert!(err.is_provider_error());
    assert!(manager.describe_object("Account").await.is_err());
    assert!(manager.all_fields("Account").await.is_err());
    assert!(!manager.cache().has(&keys::object_list(&user_id)));
    assert!(!manager.cache().has(&keys::object_info("Account", &user_id)));
    assert!(!manager.cache().has(&keys::object_fields("Account", &user_id)));

    manager.provider().fail_describe.store(false, Ordering::SeqCst);
    let objects = manager.all_objects().await.unwrap();
    assert_eq!(objects.len(), 2);
    manager.describe_object("Account").await.unwrap();
    manager.all_fields("Account").await.unwrap();

    assert_eq!(CountingProvider::count(&manager.provider().describe_globals), 2);
    assert_eq!(CountingProvider::count(&manager.provider().describes), 4);
    assert!(manager.cache().has(&keys::object_list(&user_id)));
}

#[tokio::test]
async fn test_fields_and_describe_are_memoized_independently() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();

    let fields = manager.all_fields("Account").await.unwrap();
    manager.all_fields("Account").await.unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(CountingProvider::count(&manager.provider().describes), 1);

    let describe = manager.describe_object("Account").await.unwrap();
    manager.describe_object("Account").await.unwrap();
    assert_eq!(describe.name, "Account");
    assert_eq!(CountingProvider::count(&manager.provider().describes), 2);

    manager.all_fields("Contact").await.unwrap();
    assert_eq!(CountingProvider::count(&manager.provider().describes), 3);

    let user_id = user_id_for("alice@example.com");
    assert!(manager.cache().has(&keys::object_fields("Account", &user_id)));
    assert!(manager.cache().has(&keys::object_info("Account", &user_id)));
}

#[tokio::test]
async fn test_describe_without_login_is_unauthenticated() {
    let manager = manager();
    assert!(manager.all_objects().await.unwrap_err().is_unauthenticated());
    assert!(manager
        .describe_object("Account")
        .await
        .unwrap_err()
        .is_unauthenticated());
    assert_eq!(CountingProvider::count(&manager.provider().describes), 0);
}

// ============================================================================
// Query
// ============================================================================

#[tokio::test]
async fn test_query_is_never_cached() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();

    for _ in 0..3 {
        manager.query("SELECT Id FROM Account").await.unwrap();
    }
    assert_eq!(CountingProvider::count(&manager.provider().queries), 3);
}

#[tokio::test]
async fn test_query_more_follows_pages() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();

    let first = manager.query("SELECT Id FROM Account").await.unwrap();
    assert!(first.has_more());

    let next = first.next_records_url.as_deref().unwrap();
    let second = manager.query_more(next).await.unwrap();
    assert!(second.done);
    assert_eq!(second.records[0]["Id"], "001xx0000000002");
}

#[tokio::test]
async fn test_query_error_is_returned() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();

    let err = manager.query("SELEKT Id FROM Account").await.unwrap_err();
    assert!(err.is_provider_error());
    assert!(err.to_string().contains("MALFORMED_QUERY"));
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn test_mutations_succeed() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    let records = [json!({"Name": "Acme"}), json!({"Name": "Globex"})];

    let inserted = manager.insert(&records, "Account").await.unwrap();
    assert_eq!(inserted.len(), 2);
    assert!(inserted.iter().all(|r| r.success));

    manager.update(&records, "Account").await.unwrap();
    manager
        .upsert(&records, "Account", "External_Id__c")
        .await
        .unwrap();
    manager
        .delete(&["001xx0000000001".to_string()], "Account")
        .await
        .unwrap();

    assert_eq!(CountingProvider::count(&manager.provider().saves), 4);
}

#[tokio::test]
async fn test_unsuccessful_save_fails_without_transport_error() {
    let manager = manager();
    manager.login(creds("alice@example.com", "pw")).await.unwrap();
    manager.provider().reject_saves.store(true, Ordering::SeqCst);

    let records = [json!({"Name": "Acme"}), json!({})];
    let err = manager.insert(&records, "Account").await.unwrap_err();
    match err.kind {
        ErrorKind::SaveFailed {
            object,
            message,
            results,
        } => {
            assert_eq!(object, "Account");
            assert!(message.contains("REQUIRED_FIELD_MISSING"));
            assert!(results[0].success);
            assert!(!results[1].success);
        }
        other => panic!("expected SaveFailed, got {:?}", other),
    }

    assert!(manager.update(&records, "Account").await.is_err());
    assert!(manager
        .upsert(&records, "Account", "External_Id__c")
        .await
        .is_err());
    assert!(manager
        .delete(&["001xx0000000001".to_string()], "Account")
        .await
        .is_err());
}

#[tokio::test]
async fn test_mutation_without_login_is_unauthenticated() {
    let manager = manager();
    let err = manager
        .insert(&[json!({"Name": "Acme"})], "Account")
        .await
        .unwrap_err();
    assert!(err.is_unauthenticated());
    assert_eq!(CountingProvider::count(&manager.provider().saves), 0);
}
