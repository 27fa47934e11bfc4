// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use csv::{ReaderBuilder, StringRecord};
use log::debug;
use tracksheet_app::{Column, ProgramId, ProgramRecord};

use crate::DataFetchError;

/// Parses a sheet export into records by column position.
///
/// The first non-blank row is the header and is always dropped. Rows whose
/// first cell is blank are skipped; ids count only the rows that are kept.
pub fn parse_programs_csv(text: &str) -> Result<Vec<ProgramRecord>, DataFetchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        if is_blank_line(&row) {
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        debug!("no data found in the sheet");
        return Ok(Vec::new());
    }

    let programs = rows
        .iter()
        .skip(1)
        .filter(|row| row.get(0).is_some_and(|goals| !goals.trim().is_empty()))
        .enumerate()
        .map(|(index, row)| program_from_row(index + 1, row))
        .collect();
    Ok(programs)
}

fn is_blank_line(row: &StringRecord) -> bool {
    match row.len() {
        0 => true,
        1 => row.get(0).is_some_and(str::is_empty),
        _ => false,
    }
}

fn program_from_row(position: usize, row: &StringRecord) -> ProgramRecord {
    let cell = |column: Column| row.get(column.index()).unwrap_or_default().to_owned();
    ProgramRecord {
        id: ProgramId::from_position(position),
        goals: cell(Column::Goals),
        tasks: cell(Column::Tasks),
        team: cell(Column::Team),
        priority: cell(Column::Priority),
        owner: cell(Column::Owner),
        status: cell(Column::Status),
        eta: cell(Column::Eta),
        completion_date: cell(Column::CompletionDate),
        links: cell(Column::Links),
        notes: cell(Column::Notes),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_programs_csv;

    const HEADER: &str = "Goals,Tasks,Team,Priority,Owner,Status,ETA,Completion Date,Links,Notes";

    #[test]
    fn header_only_yields_nothing() -> anyhow::Result<()> {
        assert!(parse_programs_csv(HEADER)?.is_empty());
        assert!(parse_programs_csv("")?.is_empty());
        Ok(())
    }

    #[test]
    fn short_rows_default_to_empty_and_long_rows_truncate() -> anyhow::Result<()> {
        let text = format!("{HEADER}\nShip it,,Payments\nAudit,a,b,c,d,e,f,g,h,i,extra,more\n");
        let programs = parse_programs_csv(&text)?;
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].team, "Payments");
        assert_eq!(programs[0].notes, "");
        assert_eq!(programs[1].notes, "i");
        Ok(())
    }

    #[test]
    fn quoted_cells_keep_commas_newlines_and_whitespace() -> anyhow::Result<()> {
        let text = format!("{HEADER}\n\"  Launch, v2 \",\"line one\nline two\"\n");
        let programs = parse_programs_csv(&text)?;
        assert_eq!(programs[0].goals, "  Launch, v2 ");
        assert_eq!(programs[0].tasks, "line one\nline two");
        Ok(())
    }

    #[test]
    fn blank_lines_do_not_count_as_header() -> anyhow::Result<()> {
        let text = format!("\n\n{HEADER}\n\nFirst,\n");
        let programs = parse_programs_csv(&text)?;
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].goals, "First");
        Ok(())
    }

    #[test]
    fn whitespace_goals_are_skipped_without_consuming_ids() -> anyhow::Result<()> {
        let text = format!("{HEADER}\n   ,orphan task\nKeep me\n,,,,,,\nAnd me\n");
        let programs = parse_programs_csv(&text)?;
        let ids = programs
            .iter()
            .map(|program| program.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["program-1", "program-2"]);
        assert_eq!(programs[1].goals, "And me");
        Ok(())
    }
}
