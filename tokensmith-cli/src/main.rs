//! Binary entrypoint for tokensmith-cli.

fn main() {
    if let Err(err) = tokensmith_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
