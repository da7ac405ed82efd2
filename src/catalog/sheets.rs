//! Google Sheets catalog.
//!
//! Appends rows through the Sheets v4 `values:append` endpoint with
//! `USER_ENTERED` input so image formulas are evaluated. Obtaining the OAuth
//! access token is left to the caller.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{CatalogError, CatalogRow, CatalogWriter, CATALOG_HEADERS, SCAN_CODE_COLUMN};
use crate::config::SheetsSettings;
use crate::http_client::HttpClient;

/// Sheets API base URL.
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Scan-code column range for the sheet named in `range` (e.g. `Sheet1!D:D`).
fn scan_code_range(range: &str) -> String {
    let column = (b'A' + SCAN_CODE_COLUMN as u8) as char;
    match range.split_once('!') {
        Some((sheet, _)) => format!("{}!{}:{}", sheet, column, column),
        None => format!("{}:{}", column, column),
    }
}

/// Scan codes in a single-column value range.
///
/// Row 0 is dropped only when it holds the column header; empty cells are
/// dropped after that, so row positions are still intact for the check.
fn parse_scan_codes(body: &str) -> Result<Vec<String>, CatalogError> {
    let range: ValueRange = serde_json::from_str(body)
        .map_err(|e| CatalogError::Config(format!("Unexpected Sheets response: {}", e)))?;
    let header = CATALOG_HEADERS[SCAN_CODE_COLUMN];

    Ok(range
        .values
        .into_iter()
        .map(|row| row.into_iter().next().unwrap_or_default())
        .enumerate()
        .filter(|(i, cell)| !(*i == 0 && cell.trim() == header))
        .map(|(_, cell)| cell)
        .filter(|cell| !cell.trim().is_empty())
        .collect())
}

pub struct SheetsCatalog {
    client: HttpClient,
    api_base: String,
    spreadsheet_id: String,
    range: String,
    access_token: Option<String>,
}

impl SheetsCatalog {
    pub fn new(client: HttpClient, settings: &SheetsSettings) -> Self {
        Self {
            client,
            api_base: SHEETS_API_BASE.to_string(),
            spreadsheet_id: settings.spreadsheet_id.clone(),
            range: settings.range.clone(),
            access_token: settings.access_token.clone(),
        }
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    fn token(&self) -> Result<&str, CatalogError> {
        self.access_token.as_deref().ok_or_else(|| {
            CatalogError::Config(format!(
                "no Sheets access token (set {})",
                crate::config::SHEETS_TOKEN_ENV
            ))
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.api_base,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn status_error(&self, response: crate::http_client::HttpResponse) -> CatalogError {
        let status = response.status.as_u16();
        let message = response.text().await.unwrap_or_default();
        CatalogError::Status {
            service: "sheets".to_string(),
            status,
            message: message.chars().take(200).collect(),
        }
    }
}

#[async_trait]
impl CatalogWriter for SheetsCatalog {
    fn name(&self) -> &str {
        "sheets"
    }

    async fn append(&self, row: &CatalogRow) -> Result<(), CatalogError> {
        let token = self.token()?;
        let url = format!("{}:append", self.values_url(&self.range));
        let body = json!({ "values": [row.cells()] });

        let response = self
            .client
            .post_json_authorized(
                &url,
                &[
                    ("valueInputOption", "USER_ENTERED"),
                    ("insertDataOption", "INSERT_ROWS"),
                ],
                token,
                &body,
            )
            .await?;

        if !response.is_success() {
            return Err(self.status_error(response).await);
        }
        Ok(())
    }

    async fn existing_scan_codes(&self) -> Result<Vec<String>, CatalogError> {
        let token = self.token()?;
        let url = self.values_url(&scan_code_range(&self.range));
        let response = self.client.get_authorized(&url, &[], token).await?;

        if !response.is_success() {
            return Err(self.status_error(response).await);
        }
        let body = response.text().await?;
        parse_scan_codes(&body)
    }
}
