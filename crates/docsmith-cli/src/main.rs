use std::process::ExitCode;

fn main() -> ExitCode {
    docsmith_cli::run()
}
