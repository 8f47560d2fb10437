#[tokio::main]
async fn main() -> anyhow::Result<()> {
    loadgen::run().await
}
