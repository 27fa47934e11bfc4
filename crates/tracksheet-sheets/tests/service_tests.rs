// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use std::cell::Cell;
use std::time::Duration;
use tracksheet_app::FacetSet;
use tracksheet_sheets::{DataFetchError, HttpSheetFetcher, SheetFetcher, SheetsService};
use tracksheet_testkit::{MockResponse, MockServer, ProgramFaker, sheet_csv, sheet_csv_from_rows};

struct CannedFetcher {
    text: String,
    calls: Cell<usize>,
}

impl SheetFetcher for CannedFetcher {
    fn fetch_csv(&self) -> Result<String, DataFetchError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.text.clone())
    }
}

struct DownFetcher;

impl SheetFetcher for DownFetcher {
    fn fetch_csv(&self) -> Result<String, DataFetchError> {
        Err(DataFetchError::Status {
            url: "https://sheets.invalid/export".to_owned(),
            status: 503,
        })
    }
}

#[test]
fn header_and_three_rows_with_one_blank_goal_yield_two_records() -> Result<()> {
    let text = sheet_csv_from_rows(&[
        vec!["Launch billing", "", "Payments", "P1"],
        vec!["", "orphan task", "Platform"],
        vec!["Audit logs", "", "Platform", "P0"],
    ])?;
    let service = SheetsService::new(CannedFetcher {
        text,
        calls: Cell::new(0),
    });

    let programs = service.get_programs_data()?;
    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0].id.as_str(), "program-1");
    assert_eq!(programs[0].goals, "Launch billing");
    assert_eq!(programs[1].id.as_str(), "program-2");
    assert_eq!(programs[1].goals, "Audit logs");
    Ok(())
}

#[test]
fn every_call_refetches() -> Result<()> {
    let service = SheetsService::new(CannedFetcher {
        text: sheet_csv(&ProgramFaker::new(1).programs(3))?,
        calls: Cell::new(0),
    });
    service.get_programs_data()?;
    service.get_filter_options();
    assert_eq!(service.fetcher().calls.get(), 2);
    Ok(())
}

#[test]
fn records_survive_the_csv_round_trip() -> Result<()> {
    let expected = ProgramFaker::new(21).programs(12);
    let service = SheetsService::new(CannedFetcher {
        text: sheet_csv(&expected)?,
        calls: Cell::new(0),
    });
    assert_eq!(service.get_programs_data()?, expected);
    Ok(())
}

#[test]
fn failing_fetch_propagates_for_records() {
    let service = SheetsService::new(DownFetcher);
    let error = service
        .get_programs_data()
        .expect_err("records should fail when the sheet is down");
    assert!(error.to_string().contains("503"), "{error}");
}

#[test]
fn failing_fetch_gives_empty_filter_options() {
    let service = SheetsService::new(DownFetcher);
    let facets = service.get_filter_options();
    assert_eq!(facets, FacetSet::default());
    assert!(facets.teams.is_empty());
    assert!(facets.priorities.is_empty());
    assert!(facets.owners.is_empty());
    assert!(facets.statuses.is_empty());
}

#[test]
fn http_fetcher_reads_export_body() -> Result<()> {
    let text = sheet_csv_from_rows(&[vec!["Ship it", "scope", "Growth", "P2", "Kai"]])?;
    let server = MockServer::start(vec![MockResponse::csv(text)])?;
    let fetcher = HttpSheetFetcher::new(&server.url("/export?format=csv"), Duration::from_secs(5))?;

    let programs = SheetsService::new(fetcher).get_programs_data()?;
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0].owner, "Kai");

    assert_eq!(server.finish()?, vec!["/export?format=csv".to_owned()]);
    Ok(())
}

#[test]
fn http_fetcher_rejects_non_success_status() -> Result<()> {
    let server = MockServer::start(vec![MockResponse::text(404, "Not Found")])?;
    let fetcher = HttpSheetFetcher::new(&server.url("/export"), Duration::from_secs(5))?;

    let error = fetcher
        .fetch_csv()
        .expect_err("404 should not be treated as data");
    assert!(matches!(error, DataFetchError::Status { status: 404, .. }));
    server.finish()?;
    Ok(())
}

#[test]
fn http_fetcher_reports_unreachable_host() -> Result<()> {
    let fetcher = HttpSheetFetcher::new("http://127.0.0.1:1/export", Duration::from_millis(200))?;
    let error = fetcher
        .fetch_csv()
        .expect_err("nothing listens on port 1");
    assert!(matches!(error, DataFetchError::Transport { .. }));
    assert!(error.to_string().contains("127.0.0.1:1"), "{error}");
    Ok(())
}

#[test]
fn http_fetcher_requires_url() {
    let error = HttpSheetFetcher::new("  ", Duration::from_secs(1))
        .expect_err("blank url should be rejected");
    assert!(error.to_string().contains("source.url"));
}
