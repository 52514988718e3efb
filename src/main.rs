fn main() {
    if let Err(e) = snowfriend_lib::run() {
        eprintln!("snowfriend: {e}");
        std::process::exit(1);
    }
}
