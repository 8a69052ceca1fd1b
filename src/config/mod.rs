pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::toml_config::SyncConfig;
    use crate::connection::{Connection, HttpMethod, RequestOptions};
    use crate::utils::error::{Result, SyncError};
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "isshub-sync")]
    #[command(about = "Query repository hosts the way the Isshub sync does")]
    #[command(version)]
    pub struct CliConfig {
        /// Path relative to the forge root, e.g. `repos/twidi/isshub`
        pub path: String,

        #[arg(long, help = "TOML file declaring the forges")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Forge name from the config file")]
        pub forge: Option<String>,

        #[arg(long, help = "Ad-hoc root URL, used when no config file is given")]
        pub root: Option<String>,

        #[arg(long, default_value = "GET")]
        pub method: HttpMethod,

        #[arg(long = "header", value_name = "KEY:VALUE")]
        pub headers: Vec<String>,

        #[arg(long, help = "JSON object sent as the request body")]
        pub data: Option<String>,

        #[arg(long, help = "Send data as JSON instead of a url-encoded form")]
        pub json: bool,

        #[arg(long)]
        pub path_suffix: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// The positional path, relative to the forge root. A single leading
        /// `/` is dropped so `/user` and `user` hit the same endpoint.
        pub fn request_path(&self) -> &str {
            self.path.strip_prefix('/').unwrap_or(&self.path)
        }

        pub fn parsed_headers(&self) -> Result<BTreeMap<String, String>> {
            self.headers
                .iter()
                .map(|raw| match raw.split_once(':') {
                    Some((key, value)) if !key.trim().is_empty() => {
                        Ok((key.trim().to_string(), value.trim().to_string()))
                    }
                    _ => Err(SyncError::InvalidConfigValueError {
                        field: "header".to_string(),
                        value: raw.clone(),
                        reason: "Expected KEY:VALUE".to_string(),
                    }),
                })
                .collect()
        }

        pub fn request_options(&self) -> Result<RequestOptions> {
            let mut options = RequestOptions::new();

            let headers = self.parsed_headers()?;
            if !headers.is_empty() {
                options.headers = Some(headers);
            }

            if let Some(raw) = &self.data {
                let data: serde_json::Value = serde_json::from_str(raw)?;
                options = if self.json {
                    options.json(data)
                } else {
                    options.form(data)
                };
            }

            if let Some(suffix) = &self.path_suffix {
                options = options.path_suffix(suffix.clone());
            }

            Ok(options)
        }

        /// Resolves the forge to talk to: a named one from the config file,
        /// the only one declared there, or the ad-hoc `--root`.
        pub fn connection(&self) -> Result<Connection> {
            match (&self.config, &self.root) {
                (Some(path), _) => {
                    let config = SyncConfig::from_file(path)?;
                    config.validate()?;

                    let forge = match (&self.forge, config.forges.as_slice()) {
                        (Some(name), _) => config.forge(name)?,
                        (None, [only]) => only,
                        (None, _) => {
                            return Err(SyncError::MissingConfigError {
                                field: "forge".to_string(),
                            })
                        }
                    };
                    forge.connection()
                }
                (None, Some(root)) => Connection::new(root),
                (None, None) => Err(SyncError::MissingConfigError {
                    field: "config or root".to_string(),
                }),
            }
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if self.config.is_none() {
                let root = validation::validate_required_field("root", &self.root)?;
                validation::validate_url("root", root)?;
            }
            self.parsed_headers()?;
            Ok(())
        }
    }

}
