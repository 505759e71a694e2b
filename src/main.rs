use clap::Parser;
use minuta::app::{handle_fatal_error, init_logging, AppConfig};
use minuta::cli::{execute_command, Cli};

fn main() {
    let cli = Cli::parse();

    let config = AppConfig::new(cli.verbose);
    init_logging(&config);

    if let Err(err) = execute_command(cli.command) {
        handle_fatal_error(err, cli.verbose);
    }
}
