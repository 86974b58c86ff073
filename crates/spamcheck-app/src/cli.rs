use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spamcheck")]
#[command(
    author,
    version,
    about = "Classify messages as spam and check company legitimacy"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the analyzer web UI
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "spamcheck.yaml")]
    pub config: PathBuf,

    /// Listen address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Model directory (config.json + model.safetensors)
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Tokenizer directory (tokenizer.json or vocab.txt)
    #[arg(long)]
    pub tokenizer_dir: Option<PathBuf>,

    /// Groq API key
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
