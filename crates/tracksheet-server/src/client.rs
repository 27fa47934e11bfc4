// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use std::time::Duration;
use tracksheet_app::{FacetSet, ProgramRecord};

use crate::{FILTER_OPTIONS_ACTION, PROGRAMS_PATH};

/// Blocking client for a running `/api/programs` endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: HttpClient,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("ui.api_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        let request = self.http.get(self.endpoint());
        self.send(request, "Failed to fetch programs")?
            .json()
            .context("decode programs")
    }

    pub fn fetch_filter_options(&self) -> Result<FacetSet> {
        let request = self
            .http
            .get(self.endpoint())
            .query(&[("action", FILTER_OPTIONS_ACTION)]);
        self.send(request, "Failed to fetch filter options")?
            .json()
            .context("decode filter options")
    }

    fn endpoint(&self) -> String {
        format!("{}{PROGRAMS_PATH}", self.base_url)
    }

    fn send(
        &self,
        request: RequestBuilder,
        failure: &'static str,
    ) -> Result<reqwest::blocking::Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        let status = response.status();
        if !status.is_success() {
            bail!("{failure} ({})", status.as_u16());
        }
        Ok(response)
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- start it with `tracksheet --serve` ({})",
        base_url,
        error
    )
}
