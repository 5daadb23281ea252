//! Fetches a token, then runs one patent search with it.
//!
//! Usage: `search <client-id> <client-secret> <api-key> [base-url]`

use std::env;

use anyhow::Context as _;
use patent_search_client::{Client, Config, Session};
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let client_id = args.next().context("missing <client-id>")?;
    let client_secret = args.next().context("missing <client-secret>")?;
    let api_key = args.next().context("missing <api-key>")?;
    let config = match args.next() {
        Some(base_url) => Config::from_base_url(&base_url)?,
        None => Config::default(),
    };

    let client = Client::new(config)?;
    let session = Session::new();
    session.set_api_key(api_key);

    let token: Value = match client.generate_token(&client_id, &client_secret).await {
        Ok(body) => body,
        Err(e) => {
            error!(kind = ?e.kind(), "{e}");
            return Err(e.into());
        }
    };
    let token = token
        .get("token")
        .and_then(Value::as_str)
        .context("token response has no `token` field")?;
    session.set_token(token);
    info!("token acquired");

    let query = json!({ "keywords": ["graphene", "battery"], "page": 1, "size": 10 });
    match client
        .search_patents_in_session::<_, Value>(&session, &query)
        .await
    {
        Ok(results) => info!(results = %results, "search completed"),
        Err(e) => error!(kind = ?e.kind(), "{e}"),
    }

    Ok(())
}
