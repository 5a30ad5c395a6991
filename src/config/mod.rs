use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Language selection policy
    pub languages: LanguagePolicy,

    /// Application settings
    pub app: AppConfig,
}

/// Ordered language preferences driving track selection.
///
/// Both orders are configuration, not constants: deployments differ on
/// whether Spanish or English should win, so neither sequence is hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePolicy {
    /// Languages tried, in order, when looking for a manually-authored track
    pub preferred: Vec<String>,

    /// Languages tried, in order, when falling back to auto-generated tracks
    pub fallback: Vec<String>,

    /// Language every transcript is translated to; unset keeps the
    /// transcript in whatever language it was found in
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default output format
    pub default_format: String,

    /// Directory the default-named artifact is written to (current
    /// directory if unset)
    pub output_dir: Option<PathBuf>,

    /// Show raw error detail instead of only the short message and hints
    pub show_raw_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: LanguagePolicy {
                preferred: vec!["es".to_string(), "en".to_string()],
                fallback: vec!["en".to_string(), "es".to_string()],
                target: Some("es".to_string()),
            },
            app: AppConfig {
                default_format: "pdf".to_string(),
                output_dir: None,
                show_raw_errors: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("transcripdf").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.languages.preferred.is_empty() {
            anyhow::bail!("At least one preferred language must be configured");
        }
        if self.languages.fallback.is_empty() {
            anyhow::bail!("At least one fallback language must be configured");
        }

        for code in self
            .languages
            .preferred
            .iter()
            .chain(self.languages.fallback.iter())
            .chain(self.languages.target.iter())
        {
            validate_language_code(code)?;
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Preferred languages: {}", self.languages.preferred.join(", "));
        println!("  Fallback languages: {}", self.languages.fallback.join(", "));
        match &self.languages.target {
            Some(target) => println!("  Translate to: {}", target),
            None => println!("  Translate to: (disabled)"),
        }
        println!("  Default format: {}", self.app.default_format);
        if let Some(dir) = &self.app.output_dir {
            println!("  Output directory: {}", dir.display());
        }
        println!("  Show raw errors: {}", self.app.show_raw_errors);
    }

    /// Interactive configuration setup
    pub async fn interactive_setup(&self) -> Result<()> {
        println!("Interactive configuration setup coming soon!");
        println!("For now, please edit the config file manually:");
        println!("  {}", Self::config_path()?.display());
        Ok(())
    }
}

/// Light syntactic check for BCP-47 style codes ("en", "es-419", "zh-Hans")
fn validate_language_code(code: &str) -> Result<()> {
    let valid = !code.is_empty()
        && code.len() <= 12
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !code.starts_with('-')
        && !code.ends_with('-');

    if !valid {
        anyhow::bail!("Invalid language code: {code:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.languages.preferred, vec!["es", "en"]);
        assert_eq!(config.languages.fallback, vec!["en", "es"]);
        assert_eq!(config.languages.target.as_deref(), Some("es"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.languages.preferred, config.languages.preferred);
        assert_eq!(parsed.app.default_format, config.app.default_format);
    }

    #[test]
    fn test_rejects_empty_language_lists() {
        let mut config = Config::default();
        config.languages.preferred.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_language_codes() {
        let mut config = Config::default();
        config.languages.preferred = vec!["es!".to_string()];
        assert!(config.validate().is_err());

        config.languages.preferred = vec!["-es".to_string()];
        assert!(config.validate().is_err());

        config.languages.preferred = vec!["es-419".to_string()];
        assert!(config.validate().is_ok());
    }
}
