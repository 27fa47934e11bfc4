// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod facets;
pub mod fetcher;
pub mod parse;
pub mod service;

pub use error::DataFetchError;
pub use facets::extract_facets;
pub use fetcher::{DEFAULT_SHEET_URL, HttpSheetFetcher, SheetFetcher};
pub use parse::parse_programs_csv;
pub use service::SheetsService;
