use crate::error::{AgroError, Result};
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agroreco";
const ENV_PREFIX: &str = "AGRORECO";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub carbon: CarbonConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recommendations kept per category.
    pub top_n: usize,
    /// Worker threads for batch runs; unset uses every core.
    pub workers: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            workers: None,
        }
    }
}

/// Land-allocation shares and credit pricing for the carbon estimate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CarbonConfig {
    pub rice_share: f64,
    pub primary_crop_share: f64,
    pub secondary_crop_share: f64,
    pub agroforestry_share: f64,
    pub credit_efficiency: f64,
    pub credit_price: f64,
}

impl Default for CarbonConfig {
    fn default() -> Self {
        Self {
            rice_share: 0.4,
            primary_crop_share: 0.3,
            secondary_crop_share: 0.2,
            agroforestry_share: 0.1,
            credit_efficiency: 0.85,
            credit_price: 25.0,
        }
    }
}

impl CarbonConfig {
    fn shares(&self) -> [(&'static str, f64); 4] {
        [
            ("rice_share", self.rice_share),
            ("primary_crop_share", self.primary_crop_share),
            ("secondary_crop_share", self.secondary_crop_share),
            ("agroforestry_share", self.agroforestry_share),
        ]
    }
}

/// Optional replacement catalogs; the embedded ones are used otherwise.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub zones_path: Option<PathBuf>,
    pub varieties_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Write one JSON file per analyzed farm next to the batch summary.
    pub per_farm_files: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            per_farm_files: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load from `config_override`, `./config/config.yaml` or the XDG config
    /// directory, then apply `AGRORECO__SECTION__KEY` environment overrides.
    /// Without any config file the built-in defaults are used.
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let content = match config_override {
            Some(path) => {
                if !path.exists() {
                    return Err(AgroError::Configuration(format!(
                        "Config file not found at {:?}. Run `agroreco init` to set up.",
                        path
                    )));
                }
                Some(Self::read(path)?)
            }
            None => match Self::find_config_path() {
                Some(path) => Some(Self::read(&path)?),
                None => {
                    tracing::debug!("No config file found, using defaults");
                    None
                }
            },
        };

        let config = Self::build(content.as_deref(), ENV_PREFIX)?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AgroError::Configuration(format!("Failed to read config: {}", e)))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Self::substitute_env_vars(&raw)
    }

    fn build(content: Option<&str>, env_prefix: &str) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(yaml) = content {
            builder = builder.add_source(::config::File::from_str(
                yaml,
                ::config::FileFormat::Yaml,
            ));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(env_prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<Config>())
            .map_err(|e| AgroError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.engine.top_n == 0 {
            return Err(AgroError::Configuration(
                "engine.top_n must be at least 1".into(),
            ));
        }

        let shares = self.carbon.shares();
        if let Some((name, value)) = shares.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(AgroError::Configuration(format!(
                "carbon.{} must be a non-negative number, got {}",
                name, value
            )));
        }
        let total: f64 = shares.iter().map(|(_, v)| v).sum();
        if total > 1.0 + 1e-9 {
            return Err(AgroError::Configuration(format!(
                "carbon shares sum to {:.3}, which exceeds 1.0",
                total
            )));
        }

        for (name, value) in [
            ("credit_efficiency", self.carbon.credit_efficiency),
            ("credit_price", self.carbon.credit_price),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AgroError::Configuration(format!(
                    "carbon.{} must be positive, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// First existing config file among the standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&Path>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path().is_some(),
        }
    }

    /// Default path for writing new config files (~/.config/agroreco/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroError::Configuration("Cannot determine config directory".into()))?
            .join(APP_DIR);
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let input_err = |e: dialoguer::Error| AgroError::Configuration(format!("Input error: {}", e));
        let defaults = Config::default();

        println!();
        println!("Let's set up agroreco!");
        println!();

        println!("Recommendations");
        let top_n: usize = Input::new()
            .with_prompt("  Varieties per category")
            .default(defaults.engine.top_n)
            .interact_text()
            .map_err(input_err)?;

        let workers: usize = Input::new()
            .with_prompt("  Worker threads (0 = all cores)")
            .default(0)
            .interact_text()
            .map_err(input_err)?;

        println!();

        println!("Carbon credits");
        let credit_price: f64 = Input::new()
            .with_prompt("  Price per credit")
            .default(defaults.carbon.credit_price)
            .interact_text()
            .map_err(input_err)?;

        let credit_efficiency: f64 = Input::new()
            .with_prompt("  Credit efficiency (0-1)")
            .default(defaults.carbon.credit_efficiency)
            .interact_text()
            .map_err(input_err)?;

        println!();

        println!("Output");
        let output_dir: String = Input::new()
            .with_prompt("  Output directory")
            .default(defaults.output.dir.display().to_string())
            .interact_text()
            .map_err(input_err)?;

        let per_farm_files = Confirm::new()
            .with_prompt("  Write one JSON file per farm?")
            .default(true)
            .interact()
            .map_err(input_err)?;

        println!();

        let config = Config {
            engine: EngineConfig {
                top_n,
                workers: (workers > 0).then_some(workers),
            },
            carbon: CarbonConfig {
                credit_price,
                credit_efficiency,
                ..CarbonConfig::default()
            },
            output: OutputConfig {
                dir: PathBuf::from(output_dir),
                per_farm_files,
            },
            ..Config::default()
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AgroError::Configuration(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agroreco configuration\n# Generated by `agroreco init`\n# Environment variable substitution (${{VAR}}) is supported.\n# Any key can be overridden with AGRORECO__SECTION__KEY.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    /// Replace `${VAR}` placeholders with environment values. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AgroError::Configuration(format!("Invalid placeholder pattern: {}", e)))?;

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(&self, data_dir_override: Option<&Path>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.to_path_buf());
        }

        if let Some(dir) = &self.storage.data_dir {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AgroError::Configuration("Cannot determine data directory".into()))?
            .join(APP_DIR);

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(&self, data_dir_override: Option<&Path>) -> Result<PathBuf> {
        Ok(self.data_dir(data_dir_override)?.join("agroreco.db"))
    }
}
