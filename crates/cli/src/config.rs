use agentview_runtime_config::{parse_config, to_toml, ViewerConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/agentview/)
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("agentview"))
}

/// Canonical config file path.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

fn read_config(path: &Path) -> Result<ViewerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse config at {}", path.display()))
}

/// Load config from `explicit` or the canonical path, returning defaults if
/// the canonical file does not exist.
pub fn load_config(explicit: Option<&Path>) -> Result<ViewerConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let path = config_path()?;
    if path.exists() {
        read_config(&path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(ViewerConfig::default())
    }
}

/// Print the effective configuration.
pub fn show_config(explicit: Option<&Path>) -> Result<()> {
    let config = load_config(explicit)?;
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };
    println!("# {}", path.display());
    print!("{}", to_toml(&config).context("Failed to serialize config")?);
    Ok(())
}

/// Write a default config file unless one already exists.
pub fn init_config() -> Result<()> {
    let path = config_path()?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create config dir at {}", dir.display()))?;
    let content = to_toml(&ViewerConfig::default()).context("Failed to serialize config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
