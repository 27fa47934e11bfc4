// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client as HttpClient;
use std::time::Duration;

use crate::DataFetchError;

/// Published CSV export of the programs tab.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1u5QU1aI2pDJgc5koh8cLoHpYPDwLSuwe0uun9uhPcRM/export?format=csv&gid=1272770503";

pub trait SheetFetcher {
    fn fetch_csv(&self) -> Result<String, DataFetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpSheetFetcher {
    url: String,
    http: HttpClient,
}

impl HttpSheetFetcher {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            bail!("source.url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            url: url.to_owned(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SheetFetcher for HttpSheetFetcher {
    fn fetch_csv(&self) -> Result<String, DataFetchError> {
        let transport = |source| DataFetchError::Transport {
            url: self.url.clone(),
            source,
        };

        let response = self.http.get(&self.url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataFetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(transport)
    }
}
