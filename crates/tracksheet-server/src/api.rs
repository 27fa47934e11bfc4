// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde_json::{Value, json};
use tiny_http::Method;
use tracksheet_sheets::{SheetFetcher, SheetsService};
use url::Url;

pub const PROGRAMS_PATH: &str = "/api/programs";
pub const FILTER_OPTIONS_ACTION: &str = "filter-options";

const PROGRAMS_ERROR: &str = "Failed to fetch programs data";
const NOT_FOUND: &str = "Not found";
const METHOD_NOT_ALLOWED: &str = "Method not allowed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn json(body: Result<Value, serde_json::Error>) -> Self {
        match body {
            Ok(body) => Self { status: 200, body },
            Err(_) => Self::error(500, PROGRAMS_ERROR),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Read-only view of the sheet over `GET /api/programs[?action=filter-options]`.
#[derive(Debug)]
pub struct ProgramsApi<F> {
    service: SheetsService<F>,
}

impl<F: SheetFetcher> ProgramsApi<F> {
    pub fn new(service: SheetsService<F>) -> Self {
        Self { service }
    }

    /// `target` is the request path plus query string as received on the wire.
    pub fn handle(&self, method: &Method, target: &str) -> ApiResponse {
        let Some(url) = parse_target(target) else {
            return ApiResponse::error(404, NOT_FOUND);
        };
        if url.path().trim_end_matches('/') != PROGRAMS_PATH {
            return ApiResponse::error(404, NOT_FOUND);
        }
        if !matches!(method, Method::Get | Method::Head) {
            return ApiResponse::error(405, METHOD_NOT_ALLOWED);
        }

        let action = url
            .query_pairs()
            .find(|(key, _)| key == "action")
            .map(|(_, value)| value.into_owned());
        if action.as_deref() == Some(FILTER_OPTIONS_ACTION) {
            return ApiResponse::json(serde_json::to_value(self.service.get_filter_options()));
        }

        match self.service.get_programs_data() {
            Ok(programs) => ApiResponse::json(serde_json::to_value(programs)),
            Err(_) => ApiResponse::error(500, PROGRAMS_ERROR),
        }
    }
}

fn parse_target(target: &str) -> Option<Url> {
    let base = Url::parse("http://localhost").ok()?;
    base.join(target).ok()
}

#[cfg(test)]
mod tests {
    use super::{ApiResponse, ProgramsApi};
    use serde_json::json;
    use tiny_http::Method;
    use tracksheet_sheets::{DataFetchError, SheetFetcher, SheetsService};
    use tracksheet_testkit::sheet_csv_from_rows;

    struct Fixed(Option<String>);

    impl SheetFetcher for Fixed {
        fn fetch_csv(&self) -> Result<String, DataFetchError> {
            self.0.clone().ok_or(DataFetchError::Status {
                url: "https://sheets.invalid/export".to_owned(),
                status: 500,
            })
        }
    }

    fn api_with_rows() -> anyhow::Result<ProgramsApi<Fixed>> {
        let text = sheet_csv_from_rows(&[
            vec!["Launch billing", "", "Payments", "P1", "Avery", "In Progress"],
            vec!["Audit logs", "", "Platform", "P0", "Jordan", "Completed"],
            vec!["Search revamp", "", "Platform", "", "Avery", "In Progress"],
        ])?;
        Ok(ProgramsApi::new(SheetsService::new(Fixed(Some(text)))))
    }

    fn down_api() -> ProgramsApi<Fixed> {
        ProgramsApi::new(SheetsService::new(Fixed(None)))
    }

    #[test]
    fn default_action_returns_records() -> anyhow::Result<()> {
        let response = api_with_rows()?.handle(&Method::Get, "/api/programs");
        assert_eq!(response.status, 200);
        let records = response.body.as_array().map(Vec::len);
        assert_eq!(records, Some(3));
        assert_eq!(response.body[0]["id"], "program-1");
        assert_eq!(response.body[1]["completionDate"], "");
        Ok(())
    }

    #[test]
    fn filter_options_action_returns_facets() -> anyhow::Result<()> {
        let response =
            api_with_rows()?.handle(&Method::Get, "/api/programs?action=filter-options");
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({
                "teams": ["Payments", "Platform"],
                "priorities": ["P0", "P1"],
                "owners": ["Avery", "Jordan"],
                "statuses": ["Completed", "In Progress"],
            })
        );
        Ok(())
    }

    #[test]
    fn failure_hides_detail_behind_generic_error() {
        let response = down_api().handle(&Method::Get, "/api/programs");
        assert_eq!(
            response,
            ApiResponse {
                status: 500,
                body: json!({ "error": "Failed to fetch programs data" }),
            }
        );
    }

    #[test]
    fn filter_options_never_fail() {
        let response = down_api().handle(&Method::Get, "/api/programs?action=filter-options");
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({ "teams": [], "priorities": [], "owners": [], "statuses": [] })
        );
    }

    #[test]
    fn unknown_action_falls_back_to_records() -> anyhow::Result<()> {
        let response = api_with_rows()?.handle(&Method::Get, "/api/programs?action=bogus");
        assert_eq!(response.status, 200);
        assert!(response.body.is_array());
        Ok(())
    }

    #[test]
    fn other_paths_are_not_found() -> anyhow::Result<()> {
        let api = api_with_rows()?;
        for target in ["/", "/api", "/api/programs/extra", "/api/program"] {
            let response = api.handle(&Method::Get, target);
            assert_eq!(response.status, 404, "{target}");
            assert_eq!(response.body, json!({ "error": "Not found" }));
        }
        assert_eq!(api.handle(&Method::Get, "/api/programs/").status, 200);
        Ok(())
    }

    #[test]
    fn writes_are_rejected() -> anyhow::Result<()> {
        let api = api_with_rows()?;
        for method in [Method::Post, Method::Put, Method::Delete, Method::Patch] {
            let response = api.handle(&method, "/api/programs");
            assert_eq!(response.status, 405, "{method}");
        }
        assert_eq!(api.handle(&Method::Head, "/api/programs").status, 200);
        Ok(())
    }
}
