use std::process::ExitCode;

fn main() -> ExitCode {
    turfquote_cli::run()
}
