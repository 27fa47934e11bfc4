// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use log::{error, warn};
use tracksheet_app::{FacetSet, ProgramRecord};

use crate::{DataFetchError, SheetFetcher, extract_facets, parse_programs_csv};

/// The only path to the upstream sheet. Each call refetches; nothing is cached.
#[derive(Debug, Clone)]
pub struct SheetsService<F> {
    fetcher: F,
}

impl<F: SheetFetcher> SheetsService<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn get_programs_data(&self) -> Result<Vec<ProgramRecord>, DataFetchError> {
        let result = self
            .fetcher
            .fetch_csv()
            .and_then(|text| parse_programs_csv(&text));
        if let Err(fetch_error) = &result {
            error!("fetch programs data from sheet: {fetch_error}");
        }
        result
    }

    /// Never fails: an unreachable sheet yields four empty facet lists.
    pub fn get_filter_options(&self) -> FacetSet {
        match self.get_programs_data() {
            Ok(programs) => extract_facets(&programs),
            Err(fetch_error) => {
                warn!("filter options unavailable, returning empty facets: {fetch_error}");
                FacetSet::default()
            }
        }
    }
}
