#[tokio::main]
async fn main() -> eyre::Result<()> {
    argon::run().await
}
