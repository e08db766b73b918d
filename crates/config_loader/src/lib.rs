//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `WalkthroughBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("walkthrough.toml")).unwrap();
//! println!("Join on: {}", blueprint.join.on);
//! ```

mod parser;
mod validator;

pub use contracts::WalkthroughBlueprint;
pub use parser::ConfigFormat;
pub use self::validator::validate;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    /// Relative source paths are resolved against the config file's directory.
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<WalkthroughBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        let mut blueprint = Self::load_from_str(&content, format)?;
        if let Some(base) = path.parent() {
            Self::resolve_source_paths(&mut blueprint, base);
        }
        Ok(blueprint)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<WalkthroughBlueprint, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize WalkthroughBlueprint to TOML string
    pub fn to_toml(blueprint: &WalkthroughBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize WalkthroughBlueprint to JSON string
    pub fn to_json(blueprint: &WalkthroughBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn resolve_source_paths(blueprint: &mut WalkthroughBlueprint, base: &Path) {
        for source in [
            &mut blueprint.sources.customers,
            &mut blueprint.sources.orders,
        ] {
            if source.path().is_relative() {
                source.path = base.join(&source.path).display().to_string();
            }
        }
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read config file {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<WalkthroughBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        self::validator::validate(&blueprint)?;
        Ok(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{JoinKind, NullKeyPolicy};
    use std::io::Write;
    use tempfile::Builder;

    const MINIMAL_TOML: &str = r#"
[sources.customers]
path = "data/customers.csv"

[sources.orders]
path = "data/orders.csv"
null_values = ["NA"]

[join]
on = "customer_id"
how = "inner"

[analysis]
top_n = 5
null_keys = "drop"

[[sinks]]
name = "console"
sink_type = "console"
params = { max_rows = "15" }

[[sinks]]
name = "log_sink"
sink_type = "log"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.join.on, "customer_id");
        assert_eq!(bp.analysis.top_n, 5);
        assert_eq!(bp.analysis.null_keys, NullKeyPolicy::Drop);
        assert_eq!(bp.sources.orders.null_values, vec!["NA".to_string()]);
        assert_eq!(bp.sinks[0].params.get("max_rows").map(String::as_str), Some("15"));
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.sources.customers.path, bp2.sources.customers.path);
        assert_eq!(bp.join.how, bp2.join.how);
        assert_eq!(bp.sinks.len(), bp2.sinks.len());
    }

    #[test]
    fn test_round_trip_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.analysis.top_n, bp2.analysis.top_n);
        assert_eq!(bp2.join.how, JoinKind::Inner);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = MINIMAL_TOML.replace(r#"name = "log_sink""#, r#"name = "console""#);
        let result = ConfigLoader::load_from_str(&content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();
        let bp = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(bp.analysis.top_n, 5);
        let base = file.path().parent().unwrap();
        assert_eq!(bp.sources.orders.path(), base.join("data/orders.csv"));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/walkthrough.toml"))
            .unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }
}
