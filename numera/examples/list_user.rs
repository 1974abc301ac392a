//! Fetch the current user over a fully signed and verified round trip.
//!
//! Expects `NUMERA_API_KEY`, `NUMERA_PRIVATE_KEY_FILE`, and
//! `NUMERA_SESSION_TOKEN` in the environment; set
//! `NUMERA_SERVER_PUBLIC_KEY_FILE` as well to verify responses.

use numera::{Client, Config, DefaultContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let ctx = DefaultContext::new().into_context();
    let client = Client::from_config(&ctx, Config::from_env(&ctx)).await?;

    let resp = client.get(&ctx, "/v1/user").await?;

    println!("status: {}", resp.status());
    println!("body: {}", String::from_utf8_lossy(resp.body()));
    Ok(())
}
