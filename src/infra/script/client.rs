use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::domain::entities::service::RowIndex;
use crate::usecase::ports::sheet::{Mutation, MutationAck, MutationSink, SubmissionError};

#[derive(Debug, Deserialize)]
struct ScriptReply {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "rowIndex")]
    row_index: Option<u32>,
}

/// Reads the script's reply. Anything that is not a recognisable verdict is
/// treated as sent-but-unconfirmed rather than as success.
pub fn classify_reply(body: &str) -> Result<MutationAck, SubmissionError> {
    let Ok(reply) = serde_json::from_str::<ScriptReply>(body.trim()) else {
        return Ok(MutationAck::Unconfirmed);
    };
    if reply.status.eq_ignore_ascii_case("success") {
        Ok(MutationAck::Confirmed {
            row_index: reply.row_index.map(RowIndex),
        })
    } else if reply.status.eq_ignore_ascii_case("error") {
        Err(SubmissionError::Rejected(
            reply
                .message
                .unwrap_or_else(|| "no reason given".to_string()),
        ))
    } else {
        Ok(MutationAck::Unconfirmed)
    }
}

pub fn mutation_form(sheet_name: &str, mutation: &Mutation) -> Result<Form, SubmissionError> {
    let mut form = Form::new()
        .text("sheetName", sheet_name.to_string())
        .text("action", mutation.action());
    if let Some(row_data) = mutation.row_data() {
        let encoded = serde_json::to_string(row_data)
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        form = form.text("rowData", encoded);
    }
    if let Some(row_index) = mutation.row_index() {
        form = form.text("rowIndex", row_index.to_string());
    }
    Ok(form)
}

/// Posts row mutations to the sheet's web-app script.
pub struct AppsScriptClient {
    http: Client,
    url: Url,
    sheet_name: String,
}

impl AppsScriptClient {
    pub fn new(http: Client, url: Url, sheet_name: impl Into<String>) -> Self {
        Self {
            http,
            url,
            sheet_name: sheet_name.into(),
        }
    }
}

#[async_trait]
impl MutationSink for AppsScriptClient {
    async fn submit(&self, mutation: Mutation) -> Result<MutationAck, SubmissionError> {
        let form = mutation_form(&self.sheet_name, &mutation)?;
        let response = self
            .http
            .post(self.url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Status(status.as_u16()));
        }

        match response.text().await {
            Ok(body) => classify_reply(&body),
            Err(_) => Ok(MutationAck::Unconfirmed),
        }
    }
}
