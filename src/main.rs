use agendo::display;

#[tokio::main]
async fn main() {
    if let Err(err) = agendo::cli::run().await {
        display::error(&format!("ERROR: {}", err));
        std::process::exit(1);
    }
}
