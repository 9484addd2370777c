use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fetch_bench::{
    config::{Config, FileConfig},
    list_targets, parse_targets,
    report::Report,
    Aggregator, Mode,
};
use log::debug;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let file = match &args.config {
        Some(path) => FileConfig::load(path).await?,
        None => FileConfig::default(),
    };
    let targets = match (&args.urls, &file.targets) {
        (Some(urls), _) => parse_targets(urls),
        (None, Some(targets)) => targets.clone(),
        (None, None) => list_targets(),
    };

    let mut config = file.apply(Config::default());
    if let Some(timeout) = args.connection_timeout {
        config = config.connection_timeout(Duration::from_millis(timeout));
    }
    if let Some(timeout) = args.timeout {
        config = config.timeout(Duration::from_millis(timeout));
    }
    if args.fail_fast {
        config = config.fail_fast();
    }
    debug!("Starting with {config:#?} on {targets:#?}.");
    let aggregator = Aggregator::http(config);

    if args.compare {
        let sequential = aggregator.run(Mode::Sequential, &targets).await?;
        print_report(&sequential, args.toml)?;
        let concurrent = aggregator.run(Mode::Concurrent, &targets).await?;
        print_report(&concurrent, args.toml)?;
        let speedup =
            sequential.elapsed.as_secs_f64() / concurrent.elapsed.as_secs_f64().max(1e-3);
        println!("Speedup: {speedup:.2}x");
    } else {
        let report = aggregator.run(args.mode, &targets).await?;
        print_report(&report, args.toml)?;
    }
    Ok(())
}

fn print_report(report: &Report, toml: bool) -> Result<()> {
    if toml {
        println!("{}", toml::to_string(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about = "Downloads a list of sites and reports their sizes and the total time.\n\
Without `--urls`, a fixed list of seven sites is used."
)]
struct Args {
    #[clap(short, long, help = "URLs to fetch instead, separated by commas.")]
    urls: Option<String>,
    #[clap(
        short,
        long,
        value_enum,
        default_value_t = Mode::Concurrent,
        help = "How to run the fetches."
    )]
    mode: Mode,
    #[clap(long, action, help = "Run sequentially, then concurrently, and compare.")]
    compare: bool,
    #[clap(
        short,
        long,
        help = "Connection timeout for each request in integer milliseconds."
    )]
    connection_timeout: Option<u64>,
    #[clap(short, long, help = "Total timeout for each request in integer milliseconds.")]
    timeout: Option<u64>,
    #[clap(short, long, action, help = "Abort the run on the first failed fetch.")]
    fail_fast: bool,
    #[clap(long, help = "TOML file with targets, timeouts and policy.")]
    config: Option<String>,
    #[clap(long, action, help = "Print reports as TOML.")]
    toml: bool,
}
