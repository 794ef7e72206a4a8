use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    gempa_watch::runtime::run().await
}
