use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "listing-harvest")]
#[command(about = "Collects product listings from directory category pages into a CSV")]
#[command(version)]
pub struct Args {
    /// Stop after collecting this many listings (across all categories)
    #[arg(long)]
    pub max_listings: Option<usize>,

    /// Max index pages to render per category (0 = unlimited)
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// JSON configuration file (categories, output path, renderer settings)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
