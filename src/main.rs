fn main() {
    if let Err(e) = parley::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
