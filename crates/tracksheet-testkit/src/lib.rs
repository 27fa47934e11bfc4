// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server};
use tracksheet_app::{Column, KnownStatus, ProgramId, ProgramRecord};

pub const SHEET_HEADER: [&str; 10] = [
    "Goals",
    "Tasks",
    "Team",
    "Priority",
    "Owner",
    "Status",
    "ETA",
    "Completion Date",
    "Links",
    "Notes",
];

const TEAMS: [&str; 8] = [
    "Payments",
    "Platform",
    "Growth",
    "Mobile",
    "Data",
    "Security",
    "Support Tools",
    "Infrastructure",
];

const PRIORITIES: [&str; 5] = ["P0", "P1", "P2", "Low", ""];

const OWNERS: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Rowan",
];

const GOAL_VERBS: [&str; 8] = [
    "Launch", "Migrate", "Audit", "Refresh", "Stabilize", "Automate", "Document", "Retire",
];
const GOAL_SUBJECTS: [&str; 10] = [
    "billing pipeline",
    "search index",
    "on-call rotation",
    "mobile onboarding",
    "audit logging",
    "data warehouse",
    "release train",
    "support macros",
    "edge cache",
    "feature flags",
];

const TASKS: [&str; 6] = [
    "scope, build, roll out",
    "write RFC",
    "dashboards and alerts",
    "pair with vendor",
    "backfill historical data",
    "",
];

const NOTES: [&str; 5] = [
    "blocked on legal review",
    "needs design sign-off",
    "see weekly sync notes",
    "",
    "",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible sheet rows.
#[derive(Debug, Clone)]
pub struct ProgramFaker {
    rng: DeterministicRng,
}

impl ProgramFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn program(&mut self, position: usize) -> ProgramRecord {
        let status = KnownStatus::ALL[self.rng.int_n(KnownStatus::ALL.len())];
        let eta = if self.rng.bool() {
            format!("2026-{:02}-{:02}", 1 + self.rng.int_n(12), 1 + self.rng.int_n(28))
        } else {
            String::new()
        };
        let completion_date = if status == KnownStatus::Completed {
            format!("{}/{}/2026", 1 + self.rng.int_n(12), 1 + self.rng.int_n(28))
        } else {
            String::new()
        };
        let links = if self.rng.bool() {
            format!("https://tracker.example.com/programs/{position}")
        } else {
            String::new()
        };

        ProgramRecord {
            id: ProgramId::from_position(position),
            goals: format!("{} {}", self.pick(&GOAL_VERBS), self.pick(&GOAL_SUBJECTS)),
            tasks: self.pick(&TASKS).to_owned(),
            team: self.pick(&TEAMS).to_owned(),
            priority: self.pick(&PRIORITIES).to_owned(),
            owner: self.pick(&OWNERS).to_owned(),
            status: status.as_str().to_owned(),
            eta,
            completion_date,
            links,
            notes: self.pick(&NOTES).to_owned(),
        }
    }

    /// `count` records numbered from `program-1`.
    pub fn programs(&mut self, count: usize) -> Vec<ProgramRecord> {
        (1..=count).map(|position| self.program(position)).collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// Builds an export with the standard header followed by one row per record.
pub fn sheet_csv(records: &[ProgramRecord]) -> Result<String> {
    let rows = records
        .iter()
        .map(|record| {
            Column::ALL
                .into_iter()
                .map(|column| record.text(column))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    sheet_csv_from_rows(&rows)
}

/// Builds an export with the standard header followed by raw rows of any length.
pub fn sheet_csv_from_rows(rows: &[Vec<&str>]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer
        .write_record(SHEET_HEADER)
        .context("write sheet header")?;
    for row in rows {
        writer.write_record(row).context("write sheet row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| anyhow!("flush sheet csv: {error}"))?;
    String::from_utf8(bytes).context("sheet csv is not utf-8")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    pub fn csv(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/csv",
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }
}

/// Canned-response HTTP server bound to an ephemeral local port.
///
/// Answers exactly one request per queued response, then stops.
pub struct MockServer {
    base_url: String,
    handle: JoinHandle<Result<Vec<String>>>,
}

impl MockServer {
    pub fn start(responses: Vec<MockResponse>) -> Result<Self> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let base_url = format!("http://{}", server.server_addr());

        let handle = thread::spawn(move || {
            let mut seen = Vec::with_capacity(responses.len());
            for canned in responses {
                let request = server.recv().context("receive mock request")?;
                seen.push(request.url().to_owned());
                let header = Header::from_bytes("Content-Type", canned.content_type)
                    .map_err(|()| anyhow!("invalid content type {}", canned.content_type))?;
                let response = Response::from_string(canned.body)
                    .with_status_code(canned.status)
                    .with_header(header);
                request.respond(response).context("write mock response")?;
            }
            Ok(seen)
        });

        Ok(Self { base_url, handle })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Waits for every queued response to be served and returns the request paths seen.
    pub fn finish(self) -> Result<Vec<String>> {
        self.handle
            .join()
            .map_err(|_| anyhow!("mock server thread panicked"))?
    }
}
