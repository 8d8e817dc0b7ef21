//! Spark API smoke tool
//!
//! Runs a single read-only command against the API with settings from the environment

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use sparkapi::resources::{ListMessages, ListRooms};
use sparkapi::utils::logging::init_logging;
use sparkapi::{Paginator, Settings, SparkClient, View};
use tracing::info;

const USAGE: &str = "usage: sparkapi [me | rooms | messages <roomId> | webhooks]";

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load client settings")?;
    init_logging(&settings.logging)?;
    info!("{}", sparkapi::version_info());

    let client = SparkClient::from_settings(&settings).context("Failed to create Spark client")?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("me") => {
            let me = client.people.me().await.context("Failed to fetch own profile")?;
            println!("{}", me);
        }
        Some("rooms") => {
            let rooms = client.rooms.list(ListRooms::default()).await.context("Failed to list rooms")?;
            print_all(rooms).await?;
        }
        Some("messages") => {
            let room_id = args.get(1).context(USAGE)?;
            let messages = client
                .messages
                .list(ListMessages::new(room_id.as_str()))
                .await
                .context("Failed to list messages")?;
            print_all(messages).await?;
        }
        Some("webhooks") => {
            let webhooks = client.webhooks.list(None).await.context("Failed to list webhooks")?;
            print_all(webhooks).await?;
        }
        Some(other) => anyhow::bail!("Unknown command '{}'\n{}", other, USAGE),
    }

    client.close();
    Ok(())
}

/// Print every item of a list call, fetching pages as needed
async fn print_all<T: DeserializeOwned>(mut items: Paginator<View<T>>) -> Result<()> {
    let mut count = 0usize;
    while let Some(item) = items.next().await? {
        println!("{}", item);
        count += 1;
    }
    info!("Listed {} items across {} extra pages", count, items.fetches());
    Ok(())
}
