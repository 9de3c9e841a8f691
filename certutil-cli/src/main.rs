use certutil_cli::{logging, normalize_args, run, usage, Cli, Settings};
use clap::error::ErrorKind;
use clap::Parser;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(err) => return parse_failure(&err),
    };

    let settings = match Settings::load(&cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("certutil: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_tracing(&settings.logging) {
        eprintln!("certutil: {e}");
        return ExitCode::FAILURE;
    }

    let mut stdout = io::stdout().lock();
    match run(&cli.command, &settings, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// `--help` and `--version` succeed; anything else is a usage error
fn parse_failure(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            let _ = usage::print_usage(&mut io::stdout());
            ExitCode::FAILURE
        }
    }
}
