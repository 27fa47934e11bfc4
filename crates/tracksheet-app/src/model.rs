// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::parsing::Parsed;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

use crate::ids::ProgramId;

pub const UNRANKED_PRIORITY: u32 = 999;

const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const ISO_YEAR_MONTH: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]");
const ISO_YEAR: &[BorrowedFormatItem<'_>] = format_description!("[year]");
/// Local date-time with `T` or space, optional seconds and fraction.
const ISO_DATE_TIME: &[BorrowedFormatItem<'_>] = format_description!(
    version = 2,
    "[year]-[month]-[day][first [T][ ]][hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
);
const US_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");
const DISPLAY_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// One row of the program tracking sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    pub id: ProgramId,
    pub goals: String,
    pub tasks: String,
    pub team: String,
    pub priority: String,
    pub owner: String,
    pub status: String,
    pub eta: String,
    pub completion_date: String,
    pub links: String,
    pub notes: String,
}

impl ProgramRecord {
    pub fn text(&self, column: Column) -> &str {
        match column {
            Column::Goals => &self.goals,
            Column::Tasks => &self.tasks,
            Column::Team => &self.team,
            Column::Priority => &self.priority,
            Column::Owner => &self.owner,
            Column::Status => &self.status,
            Column::Eta => &self.eta,
            Column::CompletionDate => &self.completion_date,
            Column::Links => &self.links,
            Column::Notes => &self.notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Goals,
    Tasks,
    Team,
    Priority,
    Owner,
    Status,
    Eta,
    CompletionDate,
    Links,
    Notes,
}

pub type Comparator = fn(&ProgramRecord, &ProgramRecord) -> Ordering;

impl Column {
    pub const ALL: [Self; 10] = [
        Self::Goals,
        Self::Tasks,
        Self::Team,
        Self::Priority,
        Self::Owner,
        Self::Status,
        Self::Eta,
        Self::CompletionDate,
        Self::Links,
        Self::Notes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Goals => "Goals",
            Self::Tasks => "Tasks",
            Self::Team => "Team",
            Self::Priority => "Priority",
            Self::Owner => "Owner",
            Self::Status => "Status",
            Self::Eta => "ETA",
            Self::CompletionDate => "Completion Date",
            Self::Links => "Links",
            Self::Notes => "Notes",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Ascending comparator for the column. `None` means the column never reorders rows.
    pub fn comparator(self) -> Option<Comparator> {
        let comparator: Comparator = match self {
            Self::Goals => |left, right| compare_text(&left.goals, &right.goals),
            Self::Tasks => |left, right| compare_text(&left.tasks, &right.tasks),
            Self::Team => |left, right| compare_text(&left.team, &right.team),
            Self::Owner => |left, right| compare_text(&left.owner, &right.owner),
            Self::Status => |left, right| compare_text(&left.status, &right.status),
            Self::Notes => |left, right| compare_text(&left.notes, &right.notes),
            Self::Priority => {
                |left, right| priority_rank(&left.priority).cmp(&priority_rank(&right.priority))
            }
            Self::Eta => |left, right| date_millis(&left.eta).cmp(&date_millis(&right.eta)),
            Self::CompletionDate => |left, right| {
                date_millis(&left.completion_date).cmp(&date_millis(&right.completion_date))
            },
            Self::Links => return None,
        };
        Some(comparator)
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

pub fn priority_rank(priority: &str) -> u32 {
    match priority {
        "P0" => 0,
        "P1" => 1,
        "P2" => 2,
        _ => UNRANKED_PRIORITY,
    }
}

pub fn parse_sheet_date(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(value);
    }
    if let Ok(value) = PrimitiveDateTime::parse(trimmed, ISO_DATE_TIME) {
        return Some(value.assume_utc());
    }
    if let Some(date) = [ISO_DATE, US_DATE]
        .into_iter()
        .find_map(|format| Date::parse(trimmed, format).ok())
    {
        return Some(date.midnight().assume_utc());
    }
    partial_iso_date(trimmed).map(|date| date.midnight().assume_utc())
}

/// `YYYY-MM` and `YYYY` resolve to the first day of the period.
fn partial_iso_date(raw: &str) -> Option<Date> {
    for format in [ISO_YEAR_MONTH, ISO_YEAR] {
        let mut parsed = Parsed::new();
        if parsed
            .parse_items(raw.as_bytes(), format)
            .is_ok_and(|rest| rest.is_empty())
        {
            let month = parsed.month().unwrap_or(Month::January);
            return Date::from_calendar_date(parsed.year()?, month, 1).ok();
        }
    }
    None
}

/// Milliseconds since the epoch; empty or unparseable text counts as the epoch.
pub fn date_millis(raw: &str) -> i64 {
    parse_sheet_date(raw)
        .map(|value| (value.unix_timestamp_nanos() / 1_000_000) as i64)
        .unwrap_or(0)
}

pub fn format_sheet_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "-".to_owned();
    }
    parse_sheet_date(raw)
        .and_then(|value| value.date().format(DISPLAY_DATE).ok())
        .unwrap_or_else(|| raw.to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    None,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownStatus {
    InProgress,
    Ongoing,
    ToBePicked,
    Completed,
}

impl KnownStatus {
    pub const ALL: [Self; 4] = [
        Self::InProgress,
        Self::Ongoing,
        Self::ToBePicked,
        Self::Completed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Ongoing => "Ongoing",
            Self::ToBePicked => "To be picked",
            Self::Completed => "Completed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Ongoing => "Ongoing",
            Self::ToBePicked => "To Pick",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Status,
    Priority,
    Team,
    Owner,
}

impl FilterField {
    pub const ALL: [Self; 4] = [Self::Status, Self::Priority, Self::Team, Self::Owner];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Team => "team",
            Self::Owner => "owner",
        }
    }

    pub fn record_value(self, record: &ProgramRecord) -> &str {
        match self {
            Self::Status => &record.status,
            Self::Priority => &record.priority,
            Self::Team => &record.team,
            Self::Owner => &record.owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacetSet {
    pub teams: Vec<String>,
    pub priorities: Vec<String>,
    pub owners: Vec<String>,
    pub statuses: Vec<String>,
}

impl FacetSet {
    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Status => &self.statuses,
            FilterField::Priority => &self.priorities,
            FilterField::Team => &self.teams,
            FilterField::Owner => &self.owners,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL
            .into_iter()
            .all(|field| self.values(field).is_empty())
    }
}
