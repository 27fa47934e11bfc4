// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use tracksheet_app::{FacetSet, FilterField, ProgramRecord};

pub fn extract_facets(programs: &[ProgramRecord]) -> FacetSet {
    let distinct = |field: FilterField| {
        programs
            .iter()
            .map(|program| field.record_value(program))
            .filter(|value| !value.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };

    FacetSet {
        teams: distinct(FilterField::Team),
        priorities: distinct(FilterField::Priority),
        owners: distinct(FilterField::Owner),
        statuses: distinct(FilterField::Status),
    }
}

#[cfg(test)]
mod tests {
    use super::extract_facets;
    use tracksheet_app::FacetSet;
    use tracksheet_testkit::ProgramFaker;

    #[test]
    fn empty_input_gives_empty_facets() {
        assert_eq!(extract_facets(&[]), FacetSet::default());
    }

    #[test]
    fn facets_are_distinct_sorted_and_non_empty() {
        let mut programs = ProgramFaker::new(11).programs(40);
        programs[0].team = "alpha".to_owned();
        programs[1].team = "Zulu".to_owned();
        programs[2].priority = String::new();

        let facets = extract_facets(&programs);
        for values in [
            &facets.teams,
            &facets.priorities,
            &facets.owners,
            &facets.statuses,
        ] {
            assert!(values.windows(2).all(|pair| pair[0] < pair[1]), "{values:?}");
            assert!(values.iter().all(|value| !value.is_empty()));
        }
        let zulu = facets.teams.iter().position(|team| team == "Zulu");
        let alpha = facets.teams.iter().position(|team| team == "alpha");
        assert!(zulu < alpha, "byte order puts uppercase first");
    }
}
