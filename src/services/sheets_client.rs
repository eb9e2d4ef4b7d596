use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{configuration::SheetsSettings, errors::RelayError};

use super::{ServiceAccountKey, SHEETS_SCOPE};

#[async_trait]
pub trait SheetAppender: Send + Sync {
    async fn append_row(&self, row: Vec<String>) -> Result<(), RelayError>;
}

/// Appends rows through the Sheets v4 `values.append` endpoint.
pub struct GoogleSheetsClient {
    client: Client,
    credentials: Result<ServiceAccountKey, String>,
    base_url: String,
    token_url: String,
    spreadsheet_id: Option<String>,
    range: String,
    value_input_option: String,
}

#[derive(Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl GoogleSheetsClient {
    pub fn new(settings: &SheetsSettings) -> Self {
        let credentials = ServiceAccountKey::new(
            settings.service_account_email.as_deref(),
            settings.private_key.as_deref(),
        )
        .map_err(|e| {
            log::warn!("Vision intake will fail until fixed: {}", e);
            e.to_string()
        });

        GoogleSheetsClient {
            client: reqwest::Client::new(),
            credentials,
            base_url: settings.base_url.clone(),
            token_url: settings.token_url.clone(),
            spreadsheet_id: settings
                .spreadsheet_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            range: settings.range.clone(),
            value_input_option: settings.value_input_option.clone(),
        }
    }

    fn append_url(&self, spreadsheet_id: &str) -> Result<Url, RelayError> {
        let range = format!("{}:append", self.range);
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RelayError::AppendFailed(format!("invalid sheets base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| RelayError::AppendFailed("invalid sheets base url".to_string()))?
            .pop_if_empty()
            .extend(&[
                "v4",
                "spreadsheets",
                spreadsheet_id,
                "values",
                range.as_str(),
            ]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", &self.value_input_option);

        Ok(url)
    }
}

#[async_trait]
impl SheetAppender for GoogleSheetsClient {
    async fn append_row(&self, row: Vec<String>) -> Result<(), RelayError> {
        let credentials = self
            .credentials
            .as_ref()
            .map_err(|e| RelayError::AuthFailure(e.clone()))?;
        let spreadsheet_id = self
            .spreadsheet_id
            .as_deref()
            .ok_or(RelayError::MissingConfiguration("missing_spreadsheet_id"))?;
        let url = self.append_url(spreadsheet_id)?;

        let token = credentials
            .access_token(&self.client, &self.token_url, SHEETS_SCOPE)
            .await?;

        let res = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&AppendBody { values: vec![row] })
            .send()
            .await
            .map_err(|e| {
                log::error!("Got error from sheets api: {:?}", e);
                RelayError::AppendFailed(e.to_string())
            })?;

        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let message = match res.json::<ApiErrorResponse>().await {
            Ok(json) => json.error.message,
            Err(_) => format!("sheets api answered {}", status),
        };

        Err(RelayError::AppendFailed(message))
    }
}
