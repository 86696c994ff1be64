use busbar_sf_engine::{Cache, EngineConfig, SalesforceProvider, SessionManager};

/// Load configuration for integration tests.
///
/// Integration tests MUST run against a real Salesforce org, so this panics
/// with setup instructions instead of skipping when credentials are missing.
pub fn get_config() -> EngineConfig {
    let config = EngineConfig::from_env().unwrap_or_else(|e| {
        panic!(
            "\n\nINTEGRATION TEST CONFIGURATION ERROR\n\n\
             {}\n\n\
             SF_ENVIRONMENT must be 'production' or 'sandbox'.\n\n",
            e
        )
    });

    if config.credentials().is_none() {
        panic!(
            "\n\nINTEGRATION TEST CONFIGURATION ERROR\n\n\
             SF_USERNAME and SF_PASSWORD are not set.\n\n\
             To fix:\n  \
               1. Pick a user in a sandbox or developer org\n  \
               2. Append the security token to the password if the org requires one\n  \
               3. Export: export SF_ENVIRONMENT=sandbox SF_USERNAME='...' SF_PASSWORD='...'\n\n"
        );
    }
    config
}

/// A logged-in manager with a fresh cache.
pub async fn logged_in_manager() -> SessionManager<SalesforceProvider> {
    let config = get_config();
    let manager = SessionManager::from_config(&config, Cache::new());
    let credentials = config
        .credentials()
        .cloned()
        .expect("credentials checked in get_config");

    if let Err(e) = manager.login(credentials).await {
        panic!(
            "\n\nINTEGRATION TEST AUTHENTICATION FAILED\n\n\
             Error: {}\n\n\
             This usually means:\n  \
               - The password or security token is wrong\n  \
               - SF_ENVIRONMENT points at the wrong login host\n  \
               - The user is locked out or lacks API access\n\n",
            e
        );
    }
    manager
}
