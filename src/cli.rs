use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ytlearn",
    about = "Serve learning packages (summary, key points, quiz) for YouTube videos",
    version
)]
pub struct Cli {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// LLM model used for generation
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory raw transcripts are archived to
    #[arg(long)]
    pub transcripts_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.config/ytlearn/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print resolved settings on startup
    #[arg(short, long)]
    pub verbose: bool,
}
