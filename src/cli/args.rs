use crate::config::ScanConfig;
use crate::error::DepScanError;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "depscan")]
#[command(about = "Dependency risk scanner - grades package.json dependencies by maintenance and security risk")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a package.json file ("-" reads stdin)
    Analyze {
        /// Path to the manifest
        #[arg(default_value = "package.json")]
        path: PathBuf,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Per-request timeout for upstream lookups in seconds (1-120)
        #[arg(short = 't', long, value_parser = validate_timeout)]
        timeout: Option<u64>,

        /// Maximum dependencies analyzed at once (1-50)
        #[arg(short = 'c', long, value_parser = validate_concurrency)]
        concurrency: Option<usize>,
    },
    /// Serve the analysis API over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on
        #[arg(short = 'p', long, default_value_t = 3001, env = "PORT")]
        port: u16,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn should_use_color(&self) -> bool {
        // Disable color if NO_COLOR environment variable is set
        std::env::var("NO_COLOR").is_err()
    }

    /// Environment configuration with command-line overrides applied.
    pub fn scan_config(&self) -> Result<ScanConfig, DepScanError> {
        let mut config = ScanConfig::from_env()?;

        if let Command::Analyze {
            timeout,
            concurrency,
            ..
        } = &self.command
        {
            if let Some(seconds) = timeout {
                config = config.with_timeout(*seconds);
            }
            if let Some(max) = concurrency {
                config = config.with_max_concurrent(*max);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn output_format(&self) -> OutputFormat {
        match &self.command {
            Command::Analyze { format, .. } => *format,
            Command::Serve { .. } => OutputFormat::Json,
        }
    }

    pub fn listen_addr(&self) -> Option<SocketAddr> {
        match &self.command {
            Command::Serve { host, port } => Some(SocketAddr::new(*host, *port)),
            Command::Analyze { .. } => None,
        }
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (1..=120).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 1 and 120 seconds".to_string())
    }
}

fn validate_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|_| "Concurrency must be a number")?;

    if (1..=50).contains(&value) {
        Ok(value)
    } else {
        Err("Concurrency must be between 1 and 50".to_string())
    }
}
