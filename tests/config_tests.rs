// Tests for loading and saving the configuration file.
use std::fs;
use wikical::config::Config;
use wikical::context::{AppContext, TestContext};
use wikical::locale::Language;
use wikical::selection::{DEFAULT_SECTION_TEMPLATE, SelectionLimits};

#[test]
fn test_missing_file() {
    let ctx = TestContext::new();
    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));
    assert_eq!(Config::load_or_default(&ctx).unwrap(), Config::default());
}

#[test]
fn test_partial_file_uses_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "language = \"en\"\n\n[selection]\nmax_repeated = 5\n").unwrap();

    let config = Config::load(&ctx).unwrap();
    assert_eq!(config.language, Language::En);
    assert_eq!(config.archive_threshold_days, 14);
    assert_eq!(config.selection.max_repeated, 5);
    assert_eq!(config.selection.horizon_days, SelectionLimits::default().horizon_days);
    assert_eq!(config.log_level_filter(), log::LevelFilter::Warn);
}

#[test]
fn test_malformed_file_is_an_error() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "language = [").unwrap();

    let err = Config::load_or_default(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_save_and_reload() {
    let ctx = TestContext::new();
    let config = Config {
        language: Language::Fr,
        archive_threshold_days: 30,
        log_level: "debug".to_string(),
        ..Config::default()
    };
    config.save(&ctx).unwrap();

    let loaded = Config::load(&ctx).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.log_level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_section_template() {
    let ctx = TestContext::new();
    assert_eq!(
        Config::default().section_template().unwrap(),
        DEFAULT_SECTION_TEMPLATE
    );

    let path = ctx.root.join("section.wiki");
    fs::write(&path, "{next_dates}").unwrap();
    let config = Config {
        section_template: Some(path),
        ..Config::default()
    };
    assert_eq!(config.section_template().unwrap(), "{next_dates}");

    let broken = Config {
        section_template: Some(ctx.root.join("missing.wiki")),
        ..Config::default()
    };
    assert!(broken.section_template().is_err());
}
