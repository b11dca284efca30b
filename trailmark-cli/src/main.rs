//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = trailmark_cli::run() {
        if let trailmark_cli::CliError::ArgumentParsing(clap_err) = &err {
            clap_err.exit();
        }
        eprintln!("trailmark: {err}");
        std::process::exit(1);
    }
}
