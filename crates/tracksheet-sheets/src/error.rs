// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Failure to produce the record list from the upstream sheet.
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("cannot reach sheet export {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("sheet export {url} returned {status}")]
    Status { url: String, status: u16 },
    #[error("malformed sheet csv: {0}")]
    Csv(#[from] csv::Error),
}
