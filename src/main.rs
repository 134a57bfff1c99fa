#[tokio::main]
async fn main() -> anyhow::Result<()> {
    audit_roadmap_lib::run().await
}
