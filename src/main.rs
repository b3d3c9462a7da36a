fn main() {
    if let Err(e) = channels_core::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
