//! Configuration management for specdoc.
//!
//! Parses `specdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `bundle.output`
//! - `render.template`
//! - `render.engine_dir`

mod expand;
mod options;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

pub use options::{coerce_value, insert_dotted};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "specdoc.toml";

/// Page title used when none is configured.
pub const DEFAULT_TITLE: &str = "ReDoc documentation";

/// Bundle output file used when none is configured.
pub const DEFAULT_OUTPUT: &str = "redoc-static.html";

/// Compression schemes the server knows how to apply.
const KNOWN_COMPRESSION: &[&str] = &["deflate", "gzip"];

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
/// Dotted option pairs are deep-merged into the configured maps.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override pre-rendering in serve mode.
    pub ssr: Option<bool>,
    /// Override watch mode.
    pub watch: Option<bool>,
    /// Override page title.
    pub title: Option<String>,
    /// Override template path.
    pub template: Option<PathBuf>,
    /// Override bundle output path.
    pub output: Option<PathBuf>,
    /// Override CDN usage for bundles.
    pub cdn: Option<bool>,
    /// Override web font inclusion.
    pub disable_google_font: Option<bool>,
    /// `--options.<path>=<value>` pairs, in command-line order.
    pub options: Vec<(String, String)>,
    /// `--templateOptions.<path>=<value>` pairs, in command-line order.
    pub template_options: Vec<(String, String)>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Raw bundle configuration (paths are relative strings from TOML).
    bundle: BundleConfigRaw,
    /// Raw render configuration (paths are relative strings from TOML).
    render: RenderConfigRaw,
    /// Engine options table.
    options: toml::Table,
    /// Template options table.
    template_options: toml::Table,

    /// Resolved bundle configuration (set after loading).
    #[serde(skip)]
    pub bundle_resolved: BundleConfig,
    /// Resolved render configuration (set after loading).
    #[serde(skip)]
    pub render_resolved: RenderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Serve pre-rendered pages instead of the client-side shell.
    pub ssr: bool,
    /// Re-render when the source file changes.
    pub watch: bool,
    /// Debounce window for change events, in milliseconds.
    pub debounce_ms: u64,
    /// Accepted compression schemes, highest priority first.
    pub compression: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            ssr: false,
            watch: false,
            debounce_ms: 2000,
            compression: KNOWN_COMPRESSION.iter().map(|&s| s.to_owned()).collect(),
        }
    }
}

/// Raw bundle configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BundleConfigRaw {
    output: Option<String>,
    cdn: Option<bool>,
}

/// Resolved bundle configuration.
#[derive(Debug)]
pub struct BundleConfig {
    /// Output HTML file.
    pub output: PathBuf,
    /// Reference the runtime script from a CDN instead of inlining it.
    pub cdn: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            cdn: false,
        }
    }
}

/// Raw render configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderConfigRaw {
    title: Option<String>,
    template: Option<String>,
    engine_dir: Option<String>,
    disable_google_font: Option<bool>,
}

/// Resolved render configuration.
#[derive(Debug)]
pub struct RenderConfig {
    /// Page title.
    pub title: String,
    /// Custom page template (`None` uses the built-in one).
    pub template: Option<PathBuf>,
    /// Engine distribution directory (`None` uses the default).
    pub engine_dir: Option<PathBuf>,
    /// Leave the web font stylesheet out of the default template.
    pub disable_google_font: bool,
    /// Options passed through to the rendering engine.
    pub engine_options: Map<String, Value>,
    /// Options exposed to the page template.
    pub template_options: Map<String, Value>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            template: None,
            engine_dir: None,
            disable_google_font: false,
            engine_options: Map::new(),
            template_options: Map::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`bundle.output`").
        field: String,
        /// Error message (e.g., "${`OUTPUT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Convert a TOML table into a JSON object.
fn table_to_json(table: &toml::Table, field: &str) -> Result<Map<String, Value>, ConfigError> {
    match serde_json::to_value(table) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::Validation(format!("[{field}] must be a table"))),
        Err(e) => Err(ConfigError::Validation(format!("[{field}]: {e}"))),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `specdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// a dotted option path is malformed.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings)?;
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) -> Result<(), ConfigError> {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(ssr) = settings.ssr {
            self.server.ssr = ssr;
        }
        if let Some(watch) = settings.watch {
            self.server.watch = watch;
        }
        if let Some(title) = &settings.title {
            self.render_resolved.title.clone_from(title);
        }
        if let Some(template) = &settings.template {
            self.render_resolved.template = Some(template.clone());
        }
        if let Some(output) = &settings.output {
            self.bundle_resolved.output.clone_from(output);
        }
        if let Some(cdn) = settings.cdn {
            self.bundle_resolved.cdn = cdn;
        }
        if let Some(disable) = settings.disable_google_font {
            self.render_resolved.disable_google_font = disable;
        }
        for (path, raw) in &settings.options {
            insert_dotted(
                &mut self.render_resolved.engine_options,
                path,
                coerce_value(raw),
            )?;
        }
        for (path, raw) in &settings.template_options {
            insert_dotted(
                &mut self.render_resolved.template_options,
                path,
                coerce_value(raw),
            )?;
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            bundle: BundleConfigRaw::default(),
            render: RenderConfigRaw::default(),
            options: toml::Table::new(),
            template_options: toml::Table::new(),
            bundle_resolved: BundleConfig {
                output: base.join(DEFAULT_OUTPUT),
                cdn: false,
            },
            render_resolved: RenderConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick, which makes the printed URL useless
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if self.server.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "server.debounce_ms must be greater than 0".to_owned(),
            ));
        }

        for (i, scheme) in self.server.compression.iter().enumerate() {
            if !KNOWN_COMPRESSION.contains(&scheme.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "server.compression: unknown scheme \"{scheme}\" (expected one of {})",
                    KNOWN_COMPRESSION.join(", ")
                )));
            }
            if self.server.compression[..i].contains(scheme) {
                return Err(ConfigError::Validation(format!(
                    "server.compression: \"{scheme}\" listed more than once"
                )));
            }
        }

        require_non_empty(&self.render_resolved.title, "render.title")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        expand::expand_opt(&mut self.bundle.output, "bundle.output")?;
        expand::expand_opt(&mut self.render.template, "render.template")?;
        expand::expand_opt(&mut self.render.engine_dir, "render.engine_dir")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and convert option tables.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        self.bundle_resolved = BundleConfig {
            output: config_dir.join(self.bundle.output.as_deref().unwrap_or(DEFAULT_OUTPUT)),
            cdn: self.bundle.cdn.unwrap_or(false),
        };

        self.render_resolved = RenderConfig {
            title: self
                .render
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            template: self.render.template.as_deref().map(|t| config_dir.join(t)),
            engine_dir: self.render.engine_dir.as_deref().map(|d| config_dir.join(d)),
            disable_google_font: self.render.disable_google_font.unwrap_or(false),
            engine_options: table_to_json(&self.options, "options")?,
            template_options: table_to_json(&self.template_options, "template_options")?,
        };

        Ok(())
    }
}
