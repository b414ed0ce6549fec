use color_eyre::Result;
use contactlens::config::{AppConfig, ConfigManager};
use contactlens::ChartFormat;
use tempfile::TempDir;

#[test]
fn test_load_without_config_file_uses_defaults() -> Result<()> {
    let temp = TempDir::new()?;
    let manager = ConfigManager::with_dir(temp.path().join("contactlens"));
    let config = manager.load_config()?;

    assert_eq!(config.version, "0.1");
    assert_eq!(config.display.default_limit, 5);
    assert!(!config.display.show_unknowns);
    assert_eq!(config.chart_format(), ChartFormat::Png);
    assert_eq!(config.logging.level, "warn");
    // loading never creates the directory
    assert!(!manager.config_dir().exists());
    Ok(())
}

#[test]
fn test_write_default_config_respects_force() -> Result<()> {
    let temp = TempDir::new()?;
    let manager = ConfigManager::with_dir(temp.path().join("contactlens"));

    let path = manager.write_default_config(false)?;
    assert!(path.exists());
    assert_eq!(std::fs::read_to_string(&path)?, manager.generate_default_config());

    let err = manager.write_default_config(false).unwrap_err();
    assert!(err.to_string().contains("--force"));

    std::fs::write(&path, "version = \"0.1\"\n")?;
    manager.write_default_config(true)?;
    assert_eq!(std::fs::read_to_string(&path)?, manager.generate_default_config());
    Ok(())
}

#[test]
fn test_user_config_overrides_defaults() -> Result<()> {
    let temp = TempDir::new()?;
    let manager = ConfigManager::with_dir(temp.path().to_path_buf());
    std::fs::write(
        manager.config_path("config.toml"),
        r#"
[file_loading]
delimiter = ";"

[display]
default_limit = 10
show_unknowns = true

[export]
chart_format = "eps"
directory = "/srv/exports"
"#,
    )?;

    let config = manager.load_config()?;
    assert_eq!(config.file_loading.delimiter, Some(';'));
    assert_eq!(config.file_loading.has_header, None);
    assert_eq!(config.display.default_limit, 10);
    assert!(config.display.show_unknowns);
    assert_eq!(config.chart_format(), ChartFormat::Eps);
    assert_eq!(
        config.export.directory.as_deref(),
        Some(std::path::Path::new("/srv/exports"))
    );
    assert_eq!(config.logging.level, "warn");
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let temp = TempDir::new()?;
    let manager = ConfigManager::with_dir(temp.path().to_path_buf());

    std::fs::write(manager.config_path("config.toml"), "[display\nshow_unknowns = ")?;
    let err = manager.load_config().unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    std::fs::write(
        manager.config_path("config.toml"),
        "[logging]\nlevel = \"chatty\"\n",
    )?;
    assert!(manager.load_config().is_err());
    Ok(())
}

#[test]
fn test_merge_prefers_non_default_values() {
    let mut base = AppConfig::default();
    base.display.default_limit = 8;

    let mut other = AppConfig::default();
    other.logging.level = "debug".to_string();
    base.merge(other);

    assert_eq!(base.display.default_limit, 8);
    assert_eq!(base.logging.level, "debug");
}
