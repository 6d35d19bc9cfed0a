use std::process::ExitCode;

use env_logger::{Builder, Env};

fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(err) = plastiscan::run() {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
