// File: ./src/cli.rs
//! Command-line argument handling and help text.
use crate::locale::Language;
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDateTime;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List { page: PathBuf },
    Section { page: PathBuf },
    Archive { live: PathBuf, archive: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub command: Option<Command>,
    pub help: bool,
    pub override_root: Option<PathBuf>,
    /// Each `-v` raises the log level by one step.
    pub verbose: u8,
    pub lang: Option<Language>,
    /// Local Berlin wall-clock time to evaluate the page at.
    pub now: Option<NaiveDateTime>,
    pub template: Option<PathBuf>,
    pub days: Option<i64>,
    pub write: bool,
}

fn value_of(args: &[String], i: usize, flag: &str) -> Result<String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

/// Parses `args` without the program name.
pub fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" | "help" => parsed.help = true,
            "--root" | "-r" => {
                parsed.override_root = Some(value_of(args, i, "--root")?.into());
                i += 1;
            }
            "--verbose" | "-v" => parsed.verbose += 1,
            "-vv" => parsed.verbose += 2,
            "--lang" => {
                let value = value_of(args, i, "--lang")?;
                parsed.lang = Some(
                    Language::from_locale(&value)
                        .ok_or_else(|| anyhow!("Unsupported language '{}'", value))?,
                );
                i += 1;
            }
            "--now" => {
                let value = value_of(args, i, "--now")?;
                parsed.now = Some(
                    NaiveDateTime::parse_from_str(&value, "%Y-%m-%d %H:%M")
                        .map_err(|e| anyhow!("Invalid --now '{}': {}", value, e))?,
                );
                i += 1;
            }
            "--template" => {
                parsed.template = Some(value_of(args, i, "--template")?.into());
                i += 1;
            }
            "--days" => {
                let value = value_of(args, i, "--days")?;
                parsed.days = Some(
                    value
                        .parse()
                        .map_err(|_| anyhow!("Invalid --days '{}'", value))?,
                );
                i += 1;
            }
            "--write" => parsed.write = true,
            arg if arg.starts_with('-') => bail!("Unknown option '{}'", arg),
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    if parsed.help {
        return Ok(parsed);
    }

    let mut positional = positional.into_iter();
    parsed.command = match positional.next().as_deref() {
        None => None,
        Some("list") => Some(Command::List {
            page: positional
                .next()
                .ok_or_else(|| anyhow!("list needs a page file"))?
                .into(),
        }),
        Some("section") => Some(Command::Section {
            page: positional
                .next()
                .ok_or_else(|| anyhow!("section needs a page file"))?
                .into(),
        }),
        Some("archive") => {
            let (Some(live), Some(archive)) = (positional.next(), positional.next()) else {
                bail!("archive needs the live page and the archive page");
            };
            Some(Command::Archive {
                live: live.into(),
                archive: archive.into(),
            })
        }
        Some(other) => bail!("Unknown command '{}'", other),
    };
    Ok(parsed)
}

const LEVELS: [LevelFilter; 6] = [
    LevelFilter::Off,
    LevelFilter::Error,
    LevelFilter::Warn,
    LevelFilter::Info,
    LevelFilter::Debug,
    LevelFilter::Trace,
];

/// `base` raised by one step per `-v`, capped at `Trace`.
pub fn raise_level(base: LevelFilter, verbose: u8) -> LevelFilter {
    let idx = LEVELS.iter().position(|l| *l == base).unwrap_or(2);
    LEVELS[(idx + verbose as usize).min(LEVELS.len() - 1)]
}

pub fn print_help(binary_name: &str) {
    println!(
        "Wikical v{} - Event table tooling for the Stratum 0 wiki",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} list <page.wiki>", binary_name);
    println!(
        "    {} section <page.wiki> [--lang de|en|fr] [--now \"YYYY-MM-DD HH:MM\"] [--template <file>]",
        binary_name
    );
    println!(
        "    {} archive <live.wiki> <archive.wiki> [--days N] [--write]",
        binary_name
    );
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for the config file.");
    println!("    -v, --verbose         More log output (repeatable).");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("COMMANDS:");
    println!("    list       Print every parsed entry, sorted, one per line.");
    println!("    section    Print the upcoming / recently past wiki section.");
    println!("    archive    Move rows that ended more than N days ago to the archive page.");
    println!("               Without --write only the edit summary is printed.");
    println!();
    println!("DATE COLUMN SYNTAX:");
    println!("    20.08.2014                        Whole day");
    println!("    20.08.2014 19:00                  Start time (3 hours)");
    println!("    20.08.2014 19:00 - 22:00          Time range, may pass midnight");
    println!("    20.08.2014 - 24.08.2014           Several whole days");
    println!("    20.08.2014 19:00 - 21.08.2014 03:00");
    println!("    Di/2, 19:00 - 22:00               Every second Tuesday, window in the");
    println!("                                      third column: 02.09.2014 - 16.12.2014");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn section_with_options() {
        let parsed = parse_args(&args(&[
            "-v",
            "section",
            "termine.wiki",
            "--lang",
            "en",
            "--now",
            "2014-08-20 12:00",
        ]))
        .unwrap();
        assert_eq!(
            parsed.command,
            Some(Command::Section {
                page: "termine.wiki".into()
            })
        );
        assert_eq!(parsed.verbose, 1);
        assert_eq!(parsed.lang, Some(Language::En));
        assert!(parsed.now.is_some());
    }

    #[test]
    fn archive_needs_two_pages() {
        assert!(parse_args(&args(&["archive", "live.wiki"])).is_err());
        let parsed = parse_args(&args(&["archive", "a", "b", "--days", "7", "--write"])).unwrap();
        assert_eq!(parsed.days, Some(7));
        assert!(parsed.write);
    }

    #[test]
    fn verbose_flags_raise_the_level() {
        assert_eq!(raise_level(LevelFilter::Warn, 0), LevelFilter::Warn);
        assert_eq!(raise_level(LevelFilter::Warn, 2), LevelFilter::Debug);
        assert_eq!(raise_level(LevelFilter::Error, 9), LevelFilter::Trace);
        assert_eq!(raise_level(LevelFilter::Off, 1), LevelFilter::Error);
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["list", "x", "--bogus"])).is_err());
        assert!(parse_args(&args(&["section", "x", "--lang", "xx"])).is_err());
    }
}
