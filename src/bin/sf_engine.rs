//! Command-line front end for the session engine.
//!
//! Configuration comes from the environment (see `EngineConfig::from_env`).
//!
//! ```sh
//! export SF_ENVIRONMENT=sandbox SF_USERNAME=me@example.com.dev SF_PASSWORD=passwordTOKEN
//! cargo run --bin sf-engine -- describe Account
//! ```

use anyhow::{bail, Context};
use busbar_sf_engine::{Cache, EngineConfig, SessionManager};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sf-engine <command> [args]

commands:
  objects              list every object visible to the user
  fields <object>      list the fields of an object
  describe <object>    print the full describe of an object as JSON
  query <soql>         run a SOQL query and print every page of records
  login-url            print a browser URL for the session";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let config = EngineConfig::from_env().context("reading configuration")?;
    let credentials = config.require_credentials()?.clone();
    let manager = SessionManager::from_config(&config, Cache::new());

    manager
        .login(credentials)
        .await
        .context("logging in to Salesforce")?;

    match (command.as_str(), args.get(1)) {
        ("objects", None) => {
            for object in manager.all_objects().await?.iter() {
                println!("{}\t{}", object.name, object.label);
            }
        }
        ("fields", Some(object)) => {
            for field in manager.all_fields(object).await?.iter() {
                println!("{}\t{}\t{}", field.name, field.field_type, field.label);
            }
        }
        ("describe", Some(object)) => {
            let describe = manager.describe_object(object).await?;
            println!("{}", serde_json::to_string_pretty(describe.as_ref())?);
        }
        ("query", Some(_)) => {
            let soql = args[1..].join(" ");
            let mut page = manager.query(&soql).await?;
            loop {
                for record in &page.records {
                    println!("{}", record);
                }
                match page.next_records_url.take() {
                    Some(next) if !page.done => page = manager.query_more(&next).await?,
                    _ => break,
                }
            }
        }
        ("login-url", None) => println!("{}", manager.login_url().await?),
        _ => bail!("unrecognized arguments\n\n{USAGE}"),
    }

    Ok(())
}
