fn main() {
    if let Err(err) = finance_screening::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
