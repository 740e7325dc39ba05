//! pbilint CLI entry point.

use clap::Parser;
use pbilint::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(&cli.log_level);

    let exit_code = match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}
