use clap::Parser;
use depscan::{
    cli::{Cli, CliHandler},
    error::DepScanError,
};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing(cli.is_verbose());

    let handler = CliHandler::new(cli);

    let exit_code = match handler.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            match e {
                DepScanError::InvalidInput(_) | DepScanError::NoDependencies => 3,
                DepScanError::ConfigError(_) | DepScanError::InvalidArguments(_) => 2,
                _ => 1,
            }
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "depscan=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
