#[tokio::main]
async fn main() {
    if let Err(e) = medivision_lib::run().await {
        eprintln!("medivision: {e}");
        std::process::exit(1);
    }
}
