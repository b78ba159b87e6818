#[tokio::main]
async fn main() -> std::io::Result<()> {
    cinema_booking::run().await
}
