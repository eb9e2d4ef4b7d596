use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

/// Conventional variable names used by the hosting dashboard. They win over
/// both yaml files and `APP_` prefixed variables.
const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("RESEND_API_KEY", "email.api_key"),
    ("CONTACT_FROM", "email.from"),
    ("CONTACT_TO", "email.to"),
    ("GOOGLE_SERVICE_ACCOUNT_EMAIL", "sheets.service_account_email"),
    ("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY", "sheets.private_key"),
    ("GOOGLE_SHEETS_ID", "sheets.spreadsheet_id"),
];

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email: EmailSettings,
    pub sheets: SheetsSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub site_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl EmailSettings {
    /// `to` may hold several comma separated addresses.
    pub fn recipients(&self) -> Vec<String> {
        self.to
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(|r| r.to_string())
            .collect()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SheetsSettings {
    pub base_url: String,
    pub token_url: String,
    pub range: String,
    pub value_input_option: String,
    pub service_account_email: Option<String>,
    pub private_key: Option<String>,
    pub spreadsheet_id: Option<String>,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;
    load_configuration(base_path.join("configuration"))
}

pub fn load_configuration(configuration_directory: PathBuf) -> Result<Settings, ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let mut builder = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(configuration_directory.join(environment_filename)).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    for (variable, key) in ENV_OVERRIDES {
        let value = std::env::var(variable).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    builder.build()?.try_deserialize::<Settings>()
}
