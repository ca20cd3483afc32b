use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moviereview-server")]
#[command(version, about = "MovieReview sentiment analysis server", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MOVIEREVIEW_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Sentiment pipeline artifact
    #[arg(short, long, env = "MOVIEREVIEW_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
