use std::process::ExitCode;

fn main() -> ExitCode {
    layover_cli::run()
}
