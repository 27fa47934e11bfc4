// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::sync::Arc;
use tracksheet_app::{FacetSet, ProgramRecord};
use tracksheet_server::ApiClient;
use tracksheet_sheets::{HttpSheetFetcher, SheetsService};
use tracksheet_tui::ProgramSource;

/// Reads the sheet in-process through the shared facade.
#[derive(Debug, Clone)]
pub struct DirectSource {
    service: Arc<SheetsService<HttpSheetFetcher>>,
}

impl DirectSource {
    pub fn new(service: SheetsService<HttpSheetFetcher>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl ProgramSource for DirectSource {
    fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        Ok(self.service.get_programs_data()?)
    }

    fn fetch_filter_options(&self) -> Result<FacetSet> {
        Ok(self.service.get_filter_options())
    }
}

/// Reads through a running `/api/programs` endpoint.
#[derive(Debug, Clone)]
pub struct ApiSource {
    client: ApiClient,
}

impl ApiSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl ProgramSource for ApiSource {
    fn fetch_programs(&self) -> Result<Vec<ProgramRecord>> {
        self.client.fetch_programs()
    }

    fn fetch_filter_options(&self) -> Result<FacetSet> {
        self.client.fetch_filter_options()
    }
}
