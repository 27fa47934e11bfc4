// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod api;
pub mod client;
pub mod server;

pub use api::{ApiResponse, FILTER_OPTIONS_ACTION, PROGRAMS_PATH, ProgramsApi};
pub use client::ApiClient;
pub use server::serve;
