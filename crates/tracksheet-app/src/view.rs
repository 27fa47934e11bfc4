// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Column, FacetSet, FilterField, KnownStatus, ProgramRecord, SortDirection};

pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterChoice {
    #[default]
    All,
    Only(String),
}

impl FilterChoice {
    pub fn parse(value: &str) -> Self {
        if value == FILTER_ALL {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => FILTER_ALL,
            Self::Only(value) => value,
        }
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    /// Steps through `all`, then each option in order, then back to `all`.
    pub fn next_in(&self, options: &[String]) -> Self {
        let next_index = match self {
            Self::All => 0,
            Self::Only(current) => match options.iter().position(|option| option == current) {
                Some(index) => index + 1,
                None => return Self::All,
            },
        };
        options
            .get(next_index)
            .map_or(Self::All, |value| Self::Only(value.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<Column>,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            direction: SortDirection::None,
        }
    }
}

impl SortState {
    pub fn toggle(self, column: Column) -> Self {
        if self.column != Some(column) {
            return Self {
                column: Some(column),
                direction: SortDirection::Asc,
            };
        }
        match self.direction {
            SortDirection::None => Self {
                column: Some(column),
                direction: SortDirection::Asc,
            },
            SortDirection::Asc => Self {
                column: Some(column),
                direction: SortDirection::Desc,
            },
            SortDirection::Desc => Self::default(),
        }
    }

    pub fn direction_for(&self, column: Column) -> SortDirection {
        if self.column == Some(column) {
            self.direction
        } else {
            SortDirection::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub search: String,
    pub status: FilterChoice,
    pub priority: FilterChoice,
    pub team: FilterChoice,
    pub owner: FilterChoice,
    pub sort: SortState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    SetSearch(String),
    PushSearchChar(char),
    PopSearchChar,
    SetFilter(FilterField, FilterChoice),
    CycleFilter(FilterField),
    QuickStatus(Option<KnownStatus>),
    ClearFilters,
    ToggleSort(Column),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SearchChanged(String),
    FilterChanged(FilterField, FilterChoice),
    FiltersCleared,
    SortChanged(SortState),
}

impl ViewState {
    /// `facets` supplies the option lists for `CycleFilter`.
    pub fn dispatch(&mut self, command: ViewCommand, facets: &FacetSet) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SetSearch(search) => self.set_search(search),
            ViewCommand::PushSearchChar(ch) => {
                let mut search = self.search.clone();
                search.push(ch);
                self.set_search(search)
            }
            ViewCommand::PopSearchChar => {
                let mut search = self.search.clone();
                if search.pop().is_none() {
                    return Vec::new();
                }
                self.set_search(search)
            }
            ViewCommand::SetFilter(field, choice) => self.set_filter(field, choice),
            ViewCommand::CycleFilter(field) => {
                let next = self.filter(field).next_in(facets.values(field));
                self.set_filter(field, next)
            }
            ViewCommand::QuickStatus(status) => {
                let choice = status.map_or(FilterChoice::All, |status| {
                    FilterChoice::Only(status.as_str().to_owned())
                });
                self.set_filter(FilterField::Status, choice)
            }
            ViewCommand::ClearFilters => {
                if !self.has_active_filters() {
                    return Vec::new();
                }
                self.search.clear();
                for field in FilterField::ALL {
                    *self.filter_mut(field) = FilterChoice::All;
                }
                vec![ViewEvent::FiltersCleared]
            }
            ViewCommand::ToggleSort(column) => {
                self.sort = self.sort.toggle(column);
                vec![ViewEvent::SortChanged(self.sort)]
            }
        }
    }

    pub fn filter(&self, field: FilterField) -> &FilterChoice {
        match field {
            FilterField::Status => &self.status,
            FilterField::Priority => &self.priority,
            FilterField::Team => &self.team,
            FilterField::Owner => &self.owner,
        }
    }

    fn filter_mut(&mut self, field: FilterField) -> &mut FilterChoice {
        match field {
            FilterField::Status => &mut self.status,
            FilterField::Priority => &mut self.priority,
            FilterField::Team => &mut self.team,
            FilterField::Owner => &mut self.owner,
        }
    }

    fn set_search(&mut self, search: String) -> Vec<ViewEvent> {
        if self.search == search {
            return Vec::new();
        }
        self.search = search;
        vec![ViewEvent::SearchChanged(self.search.clone())]
    }

    fn set_filter(&mut self, field: FilterField, choice: FilterChoice) -> Vec<ViewEvent> {
        let slot = self.filter_mut(field);
        if *slot == choice {
            return Vec::new();
        }
        *slot = choice.clone();
        vec![ViewEvent::FilterChanged(field, choice)]
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || FilterField::ALL
                .into_iter()
                .any(|field| *self.filter(field) != FilterChoice::All)
    }

    pub fn matches(&self, record: &ProgramRecord) -> bool {
        self.matches_search(record)
            && FilterField::ALL
                .into_iter()
                .all(|field| self.filter(field).admits(field.record_value(record)))
    }

    fn matches_search(&self, record: &ProgramRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&record.goals, &record.owner, &record.team, &record.tasks]
            .into_iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    /// Filtered and sorted copy of `records`; the input order is left untouched.
    pub fn apply(&self, records: &[ProgramRecord]) -> Vec<ProgramRecord> {
        let mut visible = records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect::<Vec<_>>();
        sort_records(&mut visible, self.sort);
        visible
    }
}

/// Stable sort: rows that compare equal keep their incoming order.
pub fn sort_records(records: &mut [ProgramRecord], sort: SortState) {
    let Some(column) = sort.column else {
        return;
    };
    let Some(compare) = column.comparator() else {
        return;
    };
    match sort.direction {
        SortDirection::None => {}
        SortDirection::Asc => records.sort_by(compare),
        SortDirection::Desc => records.sort_by(|left, right| compare(left, right).reverse()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSummary {
    pub total: usize,
    pub in_progress: usize,
    pub ongoing: usize,
    pub to_be_picked: usize,
    pub completed: usize,
}

impl StatusSummary {
    pub fn from_records(records: &[ProgramRecord]) -> Self {
        let count = |status: KnownStatus| {
            records
                .iter()
                .filter(|record| record.status == status.as_str())
                .count()
        };
        Self {
            total: records.len(),
            in_progress: count(KnownStatus::InProgress),
            ongoing: count(KnownStatus::Ongoing),
            to_be_picked: count(KnownStatus::ToBePicked),
            completed: count(KnownStatus::Completed),
        }
    }

    pub fn count(&self, status: KnownStatus) -> usize {
        match status {
            KnownStatus::InProgress => self.in_progress,
            KnownStatus::Ongoing => self.ongoing,
            KnownStatus::ToBePicked => self.to_be_picked,
            KnownStatus::Completed => self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FilterChoice, SortState, StatusSummary, ViewCommand, ViewEvent, ViewState, sort_records,
    };
    use crate::{Column, FacetSet, FilterField, KnownStatus, ProgramId, ProgramRecord, SortDirection};

    fn record(
        position: usize,
        goals: &str,
        team: &str,
        priority: &str,
        owner: &str,
        status: &str,
    ) -> ProgramRecord {
        ProgramRecord {
            id: ProgramId::from_position(position),
            goals: goals.to_owned(),
            tasks: format!("tasks for {goals}"),
            team: team.to_owned(),
            priority: priority.to_owned(),
            owner: owner.to_owned(),
            status: status.to_owned(),
            eta: String::new(),
            completion_date: String::new(),
            links: String::new(),
            notes: String::new(),
        }
    }

    fn sample() -> Vec<ProgramRecord> {
        vec![
            record(1, "Launch billing", "Payments", "P2", "Avery", "In Progress"),
            record(2, "Audit logs", "Platform", "P0", "Jordan", "Completed"),
            record(3, "Mobile refresh", "Payments", "Low", "Riley", "In Progress"),
            record(4, "Search revamp", "Platform", "P1", "Avery", "To be picked"),
            record(5, "On-call rotation", "Platform", "P0", "Quinn", "Ongoing"),
        ]
    }

    fn ids(records: &[ProgramRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.to_string()).collect()
    }

    #[test]
    fn empty_view_keeps_fetch_order() {
        let view = ViewState::default();
        assert_eq!(ids(&view.apply(&sample())), ids(&sample()));
    }

    #[test]
    fn search_matches_any_of_goals_owner_team_tasks() {
        let records = sample();
        let mut view = ViewState {
            search: "AVERY".to_owned(),
            ..ViewState::default()
        };
        assert_eq!(ids(&view.apply(&records)), vec!["program-1", "program-4"]);

        view.search = "platform".to_owned();
        assert_eq!(view.apply(&records).len(), 3);

        view.search = "tasks for audit".to_owned();
        assert_eq!(ids(&view.apply(&records)), vec!["program-2"]);

        view.search = "ongoing".to_owned();
        assert!(view.apply(&records).is_empty(), "status is not searched");
    }

    #[test]
    fn filters_combine_with_and_in_any_order() {
        let records = sample();
        let facets = FacetSet::default();

        let mut first = ViewState::default();
        first.dispatch(
            ViewCommand::SetFilter(FilterField::Status, FilterChoice::parse("In Progress")),
            &facets,
        );
        first.dispatch(
            ViewCommand::SetFilter(FilterField::Team, FilterChoice::parse("Payments")),
            &facets,
        );

        let mut second = ViewState::default();
        second.dispatch(
            ViewCommand::SetFilter(FilterField::Team, FilterChoice::parse("Payments")),
            &facets,
        );
        second.dispatch(
            ViewCommand::SetFilter(FilterField::Status, FilterChoice::parse("In Progress")),
            &facets,
        );

        assert_eq!(ids(&first.apply(&records)), vec!["program-1", "program-3"]);
        assert_eq!(ids(&first.apply(&records)), ids(&second.apply(&records)));
    }

    #[test]
    fn filter_values_match_exactly() {
        let view = ViewState {
            owner: FilterChoice::parse("avery"),
            ..ViewState::default()
        };
        assert!(view.apply(&sample()).is_empty());
    }

    #[test]
    fn priority_sort_ranks_p0_p1_p2_then_others() {
        let mut view = ViewState::default();
        view.dispatch(ViewCommand::ToggleSort(Column::Priority), &FacetSet::default());
        let sorted = view.apply(&sample());
        let priorities = sorted
            .iter()
            .map(|record| record.priority.as_str())
            .collect::<Vec<_>>();
        assert_eq!(priorities, vec!["P0", "P0", "P1", "P2", "Low"]);
        assert_eq!(ids(&sorted)[..2], ["program-2", "program-5"]);
    }

    #[test]
    fn descending_sort_keeps_ties_in_fetch_order() {
        let mut records = sample();
        sort_records(
            &mut records,
            SortState {
                column: Some(Column::Team),
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(
            ids(&records),
            vec!["program-2", "program-4", "program-5", "program-1", "program-3"]
        );
    }

    #[test]
    fn date_sort_places_empty_dates_first() {
        let mut records = sample();
        records[0].eta = "2025-06-01".to_owned();
        records[1].eta = "2025-01-15".to_owned();
        sort_records(
            &mut records,
            SortState {
                column: Some(Column::Eta),
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(
            ids(&records),
            vec!["program-3", "program-4", "program-5", "program-2", "program-1"]
        );
    }

    #[test]
    fn sort_without_comparator_is_a_no_op() {
        let mut records = sample();
        records[0].links = "https://z.example".to_owned();
        records[4].links = "https://a.example".to_owned();
        sort_records(
            &mut records,
            SortState {
                column: Some(Column::Links),
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(ids(&records), ids(&sample()));
    }

    #[test]
    fn apply_does_not_reorder_source() {
        let records = sample();
        let view = ViewState {
            sort: SortState {
                column: Some(Column::Goals),
                direction: SortDirection::Asc,
            },
            ..ViewState::default()
        };
        let sorted = view.apply(&records);
        assert_eq!(sorted[0].goals, "Audit logs");
        assert_eq!(records[0].goals, "Launch billing");
    }

    #[test]
    fn sort_toggle_cycles_asc_desc_none() {
        let first = SortState::default().toggle(Column::Goals);
        assert_eq!(first.column, Some(Column::Goals));
        assert_eq!(first.direction, SortDirection::Asc);

        let second = first.toggle(Column::Goals);
        assert_eq!(second.direction, SortDirection::Desc);

        let third = second.toggle(Column::Goals);
        assert_eq!(third, SortState::default());

        let fourth = third.toggle(Column::Goals);
        assert_eq!(fourth, first);
    }

    #[test]
    fn sort_toggle_on_other_column_restarts_ascending() {
        let state = SortState::default()
            .toggle(Column::Goals)
            .toggle(Column::Goals)
            .toggle(Column::Owner);
        assert_eq!(state.column, Some(Column::Owner));
        assert_eq!(state.direction, SortDirection::Asc);
        assert_eq!(state.direction_for(Column::Goals), SortDirection::None);
    }

    #[test]
    fn summary_counts_ignore_active_filters() {
        let records = sample();
        let mut view = ViewState::default();
        view.dispatch(
            ViewCommand::QuickStatus(Some(KnownStatus::InProgress)),
            &FacetSet::default(),
        );
        assert_eq!(view.apply(&records).len(), 2);

        let summary = StatusSummary::from_records(&records);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.count(KnownStatus::Completed), 1);
        assert_eq!(summary.in_progress, 2);
        assert_eq!(summary.ongoing, 1);
        assert_eq!(summary.to_be_picked, 1);
    }

    #[test]
    fn cycle_filter_walks_facets_and_wraps_to_all() {
        let facets = FacetSet {
            teams: vec!["Payments".to_owned(), "Platform".to_owned()],
            ..FacetSet::default()
        };
        let mut view = ViewState::default();

        view.dispatch(ViewCommand::CycleFilter(FilterField::Team), &facets);
        assert_eq!(view.team, FilterChoice::Only("Payments".to_owned()));
        view.dispatch(ViewCommand::CycleFilter(FilterField::Team), &facets);
        assert_eq!(view.team, FilterChoice::Only("Platform".to_owned()));
        let events = view.dispatch(ViewCommand::CycleFilter(FilterField::Team), &facets);
        assert_eq!(view.team, FilterChoice::All);
        assert_eq!(
            events,
            vec![ViewEvent::FilterChanged(FilterField::Team, FilterChoice::All)]
        );
    }

    #[test]
    fn cycle_filter_resets_stale_selection() {
        let facets = FacetSet {
            owners: vec!["Kai".to_owned()],
            ..FacetSet::default()
        };
        let mut view = ViewState {
            owner: FilterChoice::Only("Gone".to_owned()),
            ..ViewState::default()
        };
        view.dispatch(ViewCommand::CycleFilter(FilterField::Owner), &facets);
        assert_eq!(view.owner, FilterChoice::All);
    }

    #[test]
    fn clear_filters_resets_search_and_filters_but_not_sort() {
        let facets = FacetSet::default();
        let mut view = ViewState::default();
        assert!(view.dispatch(ViewCommand::ClearFilters, &facets).is_empty());

        view.dispatch(ViewCommand::SetSearch("billing".to_owned()), &facets);
        view.dispatch(
            ViewCommand::SetFilter(FilterField::Priority, FilterChoice::parse("P0")),
            &facets,
        );
        view.dispatch(ViewCommand::ToggleSort(Column::Owner), &facets);
        assert!(view.has_active_filters());

        let events = view.dispatch(ViewCommand::ClearFilters, &facets);
        assert_eq!(events, vec![ViewEvent::FiltersCleared]);
        assert!(!view.has_active_filters());
        assert_eq!(view.sort.column, Some(Column::Owner));
    }

    #[test]
    fn search_editing_emits_change_events() {
        let facets = FacetSet::default();
        let mut view = ViewState::default();
        assert!(view.dispatch(ViewCommand::PopSearchChar, &facets).is_empty());

        view.dispatch(ViewCommand::PushSearchChar('o'), &facets);
        let events = view.dispatch(ViewCommand::PushSearchChar('k'), &facets);
        assert_eq!(events, vec![ViewEvent::SearchChanged("ok".to_owned())]);

        view.dispatch(ViewCommand::PopSearchChar, &facets);
        assert_eq!(view.search, "o");
    }

    #[test]
    fn quick_status_total_resets_status_filter() {
        let facets = FacetSet::default();
        let mut view = ViewState {
            status: FilterChoice::parse("Completed"),
            ..ViewState::default()
        };
        view.dispatch(ViewCommand::QuickStatus(None), &facets);
        assert_eq!(view.status, FilterChoice::All);
        assert_eq!(view.status.as_str(), "all");
    }
}
