// Binary entry point for the command line tool.
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::fs;
use std::path::Path;
use wikical::archive::archive;
use wikical::cli::{self, Args, Command};
use wikical::config::Config;
use wikical::context::StandardContext;
use wikical::model::item::localize;
use wikical::model::{EntryDisplay, TIMEZONE, flatten, parse_page, parse_table};
use wikical::selection::render_wiki_section;

/// Installs the terminal logger wide open; `log::set_max_level` does the
/// actual filtering so the level can change once the config is read.
fn init_logging(level: LevelFilter) {
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to install logger: {}", e);
    }
    log::set_max_level(level);
}

fn read_page(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read page '{}'", path.display()))
}

fn write_if_changed(path: &Path, old: &str, new: &str) -> Result<bool> {
    if old == new {
        return Ok(false);
    }
    fs::write(path, new).with_context(|| format!("Failed to write page '{}'", path.display()))?;
    Ok(true)
}

fn run_list(page: &Path) -> Result<()> {
    let content = read_page(page)?;
    let parsed = parse_page(&content);

    let mut entries = flatten(&parsed.rows);
    entries.sort();
    for entry in &entries {
        println!(
            "{} | {} | {} | {}",
            entry.date_string(),
            entry.category.as_deref().unwrap_or("-"),
            entry.plain_name(),
            entry.url().unwrap_or_default()
        );
    }
    if !parsed.invalid.is_empty() {
        log::info!(
            "{} rows in {} could not be parsed",
            parsed.invalid.len(),
            page.display()
        );
    }
    Ok(())
}

fn run_section(args: &Args, config: &Config, page: &Path, now: DateTime<Tz>) -> Result<()> {
    let content = read_page(page)?;
    let template = match &args.template {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read section template '{}'", path.display()))?,
        None => config.section_template()?,
    };
    let lang = args.lang.unwrap_or(config.language);
    let entries = flatten(&parse_table(&content));
    println!(
        "{}",
        render_wiki_section(&template, &entries, lang, now, &config.selection)
    );
    Ok(())
}

fn run_archive(
    args: &Args,
    config: &Config,
    live: &Path,
    archive_page: &Path,
    now: DateTime<Tz>,
) -> Result<()> {
    let live_text = read_page(live)?;
    let archive_text = read_page(archive_page)?;
    let days = args.days.unwrap_or(config.archive_threshold_days);
    let threshold = now - Duration::days(days);

    let outcome = archive(&live_text, &archive_text, threshold);
    let live_changed = outcome.live_text != live_text;
    let archive_changed = outcome.archive_text != archive_text;

    if !live_changed && !archive_changed {
        println!("Nothing to do");
        return Ok(());
    }
    println!("> {}", outcome.summary());
    println!("minor: {}", outcome.is_minor());

    if args.write {
        if write_if_changed(live, &live_text, &outcome.live_text)? {
            log::info!("Wrote {}", live.display());
        }
        if write_if_changed(archive_page, &archive_text, &outcome.archive_text)? {
            log::info!("Wrote {}", archive_page.display());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = cli::parse_args(&raw)?;

    // `--help` leaves the command unset.
    let Some(command) = args.command.clone() else {
        cli::print_help("wikical");
        return Ok(());
    };

    init_logging(cli::raise_level(LevelFilter::Warn, args.verbose));
    let ctx = StandardContext::new(args.override_root.clone());
    let config = Config::load_or_default(&ctx)?;
    log::set_max_level(cli::raise_level(config.log_level_filter(), args.verbose));

    let now = match args.now {
        Some(local) => localize(local),
        None => Utc::now().with_timezone(&TIMEZONE),
    };

    match command {
        Command::List { page } => run_list(&page),
        Command::Section { page } => run_section(&args, &config, &page, now),
        Command::Archive { live, archive } => run_archive(&args, &config, &live, &archive, now),
    }
}
