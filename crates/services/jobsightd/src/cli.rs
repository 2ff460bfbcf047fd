use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "jobsightd")]
#[command(about = "Jobsight - Browse, search and compare analyzed jobs")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration file
    #[arg(short, long)]
    pub address: Option<String>,

    /// Apply pending database migrations before serving
    #[arg(long)]
    pub migrate: bool,
}
