use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    barcode_scanner_cli::run().await?;
    Ok(())
}
