use clap::Parser;
use listing_harvest::{Collector, ScraperConfig};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut collector = match &args.config {
        Some(path) => match Collector::with_config_file(path) {
            Ok(collector) => collector,
            Err(e) => {
                ::log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Collector::new(ScraperConfig::default()),
    };

    // Flags take precedence over the config file
    if let Some(n) = args.max_listings {
        collector = collector.with_max_listings(n);
    }
    if let Some(n) = args.max_pages {
        collector = collector.with_max_pages(n);
    }

    println!("Note: rendering requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default {}",
        collector.config().render.webdriver_url
    );

    let start_time = std::time::Instant::now();
    match collector.run().await {
        Ok(report) => {
            ::log::info!(
                "Run complete - {} listings in {:.2} seconds",
                report.stats.records_kept,
                start_time.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
