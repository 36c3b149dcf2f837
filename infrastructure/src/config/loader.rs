//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["steward.toml", ".steward.toml"];
const ENV_PREFIX: &str = "STEWARD_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .extract()
        .map_err(Box::new)
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/steward/config.toml` (or the platform equivalent)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("steward").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Variables: {}*", ENV_PREFIX);

        if let Some(path) = explicit {
            let found = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", found, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project:  {}", path.display()),
            None => println!("  [     ] Project:  ./steward.toml or ./.steward.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let found = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:   {}", found, path.display());
        }

        println!("  [     ] Default:  built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.execution.success_rate, 0.85);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("steward/config.toml"));
    }

    #[test]
    fn test_later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&global, "[execution]\nthink_ms = 1\nsettle_ms = 7\n").unwrap();
        fs::write(&explicit, "[execution]\nthink_ms = 2\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&global), None, Some(&explicit))
            .extract()
            .unwrap();
        assert_eq!(config.execution.think_ms, 2);
        assert_eq!(config.execution.settle_ms, 7);
        assert_eq!(config.execution.execution_ms, 2000);
    }

    #[test]
    fn test_missing_global_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config: FileConfig =
            ConfigLoader::figment(Some(&dir.path().join("absent.toml")), None, None)
                .extract()
                .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_env_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("steward.toml", "[planner]\nlatency_ms = 10\n")?;
            jail.set_env("STEWARD_PLANNER__LATENCY_MS", "0");
            jail.set_env("STEWARD_EXECUTION__SUCCESS_RATE", "1.0");

            let config: FileConfig =
                ConfigLoader::figment(None, Some(Path::new("steward.toml")), None).extract()?;
            assert_eq!(config.planner.latency_ms, 0);
            assert_eq!(config.execution.success_rate, 1.0);
            Ok(())
        });
    }
}
