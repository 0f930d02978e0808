fn main() {
    if let Err(e) = movepass_lib::run() {
        eprintln!("movepass: {e}");
        std::process::exit(1);
    }
}
