use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::infra::gviz::parse::parse_export;
use crate::usecase::ports::sheet::{LoadError, RawTable, SheetSource};

const EXPORT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

pub fn export_url(sheet_id: &str, sheet_name: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{EXPORT_BASE_URL}/{sheet_id}/gviz/tq"))
        .with_context(|| format!("invalid sheet id: {sheet_id}"))?;
    url.query_pairs_mut()
        .append_pair("tqx", "out:json")
        .append_pair("sheet", sheet_name);
    Ok(url)
}

/// Reads the sheet through its JSON visualisation export.
pub struct GvizClient {
    http: Client,
    url: Url,
}

impl GvizClient {
    pub fn new(http: Client, sheet_id: &str, sheet_name: &str) -> Result<Self> {
        Ok(Self {
            http,
            url: export_url(sheet_id, sheet_name)?,
        })
    }
}

#[async_trait]
impl SheetSource for GvizClient {
    async fn fetch_table(&self) -> Result<RawTable, LoadError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|err| LoadError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| LoadError::Transport(err.to_string()))?;
        parse_export(&body)
    }
}
