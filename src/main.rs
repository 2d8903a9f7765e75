#[tokio::main]
async fn main() {
    if let Err(e) = musicvibe::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
