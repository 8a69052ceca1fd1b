use crate::connection::Connection;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub sync: SyncSection,
    #[serde(default)]
    pub forges: Vec<ForgeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForgeKind {
    Github,
    Gitlab,
    Bitbucket,
    Custom,
}

impl ForgeKind {
    /// Public API root of the hosted forge, if there is a well-known one.
    pub fn default_root(&self) -> Option<&'static str> {
        match self {
            ForgeKind::Github => Some("https://api.github.com"),
            ForgeKind::Gitlab => Some("https://gitlab.com/api/v4"),
            ForgeKind::Bitbucket => Some("https://api.bitbucket.org/2.0"),
            ForgeKind::Custom => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    pub name: String,
    pub kind: ForgeKind,
    pub root: Option<String>,
    pub path_suffix: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl ForgeConfig {
    /// The configured root, or the kind's default one.
    pub fn root(&self) -> Result<&str> {
        match (&self.root, self.kind.default_root()) {
            (Some(root), _) => Ok(root),
            (None, Some(root)) => Ok(root),
            (None, None) => Err(SyncError::MissingConfigError {
                field: format!("forges.{}.root", self.name),
            }),
        }
    }

    pub fn connection(&self) -> Result<Connection> {
        let mut connection = Connection::new(self.root()?)?;

        if let Some(suffix) = &self.path_suffix {
            connection = connection.with_path_suffix(suffix.clone());
        }
        if let Some(headers) = &self.headers {
            connection = connection.with_default_headers(headers.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            connection = connection.with_timeout(Duration::from_secs(timeout));
        }

        tracing::debug!("🔧 Forge '{}' bound to {}", self.name, connection.root());
        Ok(connection)
    }
}

impl SyncConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SyncError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn forge(&self, name: &str) -> Result<&ForgeConfig> {
        self.forges
            .iter()
            .find(|forge| forge.name == name)
            .ok_or_else(|| SyncError::UnknownForge {
                name: name.to_string(),
            })
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("sync.name", &self.sync.name)?;
        validation::validate_unique_names(
            "forges.name",
            self.forges.iter().map(|forge| forge.name.as_str()),
        )?;

        for forge in &self.forges {
            validation::validate_non_empty_string("forges.name", &forge.name)?;

            let field = format!("forges.{}.root", forge.name);
            if forge.kind == ForgeKind::Custom {
                validation::validate_required_field(&field, &forge.root)?;
            }
            validation::validate_url(&field, forge.root()?)?;

            if let Some(timeout) = forge.timeout_seconds {
                validation::validate_positive_number(
                    &format!("forges.{}.timeout_seconds", forge.name),
                    timeout,
                    1,
                )?;
            }
        }

        Ok(())
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
