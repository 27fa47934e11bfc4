// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FacetSet, ProgramRecord};

/// Work the caller must start after a feed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedRequest {
    Programs,
    FilterOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    ProgramsLoaded(Result<Vec<ProgramRecord>, String>),
    FilterOptionsLoaded(Result<FacetSet, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedChange {
    ProgramsReplaced(usize),
    ProgramsFailed(String),
    FilterOptionsReplaced,
    FilterOptionsFailed(String),
}

/// Client-side holder for the records and facets shown by the dashboard.
///
/// Requests are not cancellable: overlapping refreshes each decrement the
/// pending count when they land and the last response to arrive wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramFeed {
    pub programs: Vec<ProgramRecord>,
    pub filter_options: FacetSet,
    pub error: Option<String>,
    programs_pending: usize,
    filter_options_pending: usize,
}

impl ProgramFeed {
    pub fn mount(&mut self) -> Vec<FeedRequest> {
        self.error = None;
        self.programs_pending += 1;
        self.filter_options_pending += 1;
        vec![FeedRequest::Programs, FeedRequest::FilterOptions]
    }

    pub fn refresh(&mut self) -> Vec<FeedRequest> {
        self.error = None;
        self.programs_pending += 1;
        vec![FeedRequest::Programs]
    }

    pub fn loading(&self) -> bool {
        self.programs_pending > 0 || self.filter_options_pending > 0
    }

    pub fn apply(&mut self, event: FeedEvent) -> FeedChange {
        match event {
            FeedEvent::ProgramsLoaded(result) => {
                self.programs_pending = self.programs_pending.saturating_sub(1);
                match result {
                    Ok(programs) => {
                        self.programs = programs;
                        FeedChange::ProgramsReplaced(self.programs.len())
                    }
                    Err(error) => {
                        self.error = Some(error.clone());
                        FeedChange::ProgramsFailed(error)
                    }
                }
            }
            FeedEvent::FilterOptionsLoaded(result) => {
                self.filter_options_pending = self.filter_options_pending.saturating_sub(1);
                match result {
                    Ok(filter_options) => {
                        self.filter_options = filter_options;
                        FeedChange::FilterOptionsReplaced
                    }
                    Err(error) => FeedChange::FilterOptionsFailed(error),
                }
            }
        }
    }
}
