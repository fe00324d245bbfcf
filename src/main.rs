/*
 * Responsibility
 * - tokio runtime entry
 * - app::run() only (no logic here)
 */
use anyhow::Result;

mod app;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
