use clap::Parser;
use tracing_subscriber::EnvFilter;

use daybook::cli::{Cli, Commands};
use daybook::config::Config;
use daybook::errors::ArchiveResult;
use daybook::services::{ArchiveService, Bucketizer, ConfigLoader, CrawlService};
use daybook::sources::RssSource;
use daybook::storage::JsonDayRepository;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("daybook=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> ArchiveResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env(&cli.base_dir)?;
    config.prepare_layout()?;

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => cmd_run(&config, dry_run),
        Commands::Channels => cmd_channels(&config),
        Commands::Days => cmd_days(&config),
    }
}

fn cmd_run(config: &Config, dry_run: bool) -> ArchiveResult<()> {
    let groups = ConfigLoader::new(&config.channels_dir).load()?;

    println!(
        "Fetching {} feeds from {} owners...\n",
        groups.url_count(),
        groups.len()
    );

    let crawl_service = CrawlService::new(RssSource::with_timeout(config.fetch_timeout)?);
    let crawl = crawl_service.crawl(&groups)?;

    println!(
        "Fetched {} channels ({} articles).",
        crawl.channels.len(),
        crawl.item_count()
    );

    if !crawl.failed.is_empty() {
        println!("Failed {} feeds:", crawl.failed.len());
        for (url, error) in &crawl.failed {
            println!("  ! {}: {}", url, error);
        }
    }
    println!();

    let rearranged = Bucketizer::new(config.timezones.clone()).rearrange(crawl.channels);

    if rearranged.skipped > 0 {
        println!(
            "Skipped {} articles with an unusable publication date.\n",
            rearranged.skipped
        );
    }

    if rearranged.duplicates > 0 {
        println!(
            "Dropped {} articles repeating a title in the same channel.\n",
            rearranged.duplicates
        );
    }

    if rearranged.days.is_empty() {
        println!("No dated articles to archive.");
        return Ok(());
    }

    if dry_run {
        for day in &rearranged.days {
            println!("  [DRY RUN] {} ({} articles)", day.date, day.item_count());
        }
        println!(
            "\nDry run complete. Would update {} days.",
            rearranged.days.len()
        );
        return Ok(());
    }

    let archive_service = ArchiveService::new(JsonDayRepository::new(&config.items_dir));
    let saved = archive_service.save(rearranged.days)?;

    for day in &saved {
        println!("  {} (+{} new, {} total)", day.date, day.added, day.total);
    }

    println!(
        "\nArchived {} new articles across {} days.",
        saved.iter().map(|d| d.added).sum::<usize>(),
        saved.len()
    );

    Ok(())
}

fn cmd_channels(config: &Config) -> ArchiveResult<()> {
    let groups = ConfigLoader::new(&config.channels_dir).load()?;

    if groups.is_empty() {
        println!("No channels configured.");
        return Ok(());
    }

    println!("Configured channels:\n");
    for group in &groups {
        println!("  {} ({} feeds)", group.owner, group.channels.len());
        for url in &group.channels {
            println!("    {}", url);
        }
        println!();
    }

    Ok(())
}

fn cmd_days(config: &Config) -> ArchiveResult<()> {
    let archive_service = ArchiveService::new(JsonDayRepository::new(&config.items_dir));
    let summaries = archive_service.summaries()?;

    if summaries.is_empty() {
        println!("No archived days.");
        return Ok(());
    }

    println!("Archived days:\n");
    for day in summaries {
        println!("  {} ({} articles)", day.date, day.total);
    }

    Ok(())
}
