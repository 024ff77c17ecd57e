fn main() {
    match propgen::run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("{}", propgen::format_error(&err));
            std::process::exit(1);
        }
    }
}
