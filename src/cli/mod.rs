pub mod args;
pub mod reporter;

pub use args::{Cli, Command, OutputFormat};
pub use reporter::ReportFormatter;

use crate::analyzer::DependencyAnalyzer;
use crate::error::DepScanError;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(&self) -> Result<i32, DepScanError> {
        let config = self.cli.scan_config()?;
        let analyzer = DependencyAnalyzer::new(&config)?;

        match &self.cli.command {
            Command::Analyze { path, .. } => self.run_analysis(&analyzer, path).await,
            Command::Serve { .. } => {
                let addr = self.cli.listen_addr().ok_or_else(|| {
                    DepScanError::InvalidArguments("serve requires a listen address".to_string())
                })?;
                crate::server::serve(Arc::new(analyzer), addr).await?;
                Ok(0)
            }
        }
    }

    async fn run_analysis(&self, analyzer: &DependencyAnalyzer, path: &Path) -> Result<i32, DepScanError> {
        let formatter = ReportFormatter::new(&self.cli);

        // Step 1: Read the manifest
        let content = self.read_manifest(path)?;
        if self.cli.is_verbose() {
            eprintln!(
                "{}",
                formatter.format_progress(&format!("Read {} bytes from {}", content.len(), path.display()))
            );
            eprintln!("{}", formatter.format_progress(&analyzer.get_config_info()));
        }

        // Step 2: Analyze; only manifest errors abort
        let result = match analyzer.analyze_manifest(&content).await {
            Ok(result) => result,
            Err(e) if e.is_client_error() => {
                eprintln!("{}", formatter.format_error(&e));
                return Ok(3);
            }
            Err(e) => return Err(e),
        };

        // Step 3: Render
        match self.cli.output_format() {
            OutputFormat::Json => println!("{}", formatter.format_json(&result)?),
            OutputFormat::Text => println!("{}", formatter.format_analysis_report(&result)),
        }

        Ok(0)
    }

    fn read_manifest(&self, path: &Path) -> Result<String, DepScanError> {
        if path.as_os_str() == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            return Ok(buffer);
        }

        Ok(std::fs::read_to_string(path)?)
    }
}
