// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Column;

pub const MIN_COLUMN_WIDTH: u32 = 80;
/// Logical pixels represented by one terminal cell.
pub const PX_PER_CELL: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: [u32; Column::ALL.len()],
}

impl Default for ColumnWidths {
    fn default() -> Self {
        let mut widths = [0; Column::ALL.len()];
        for column in Column::ALL {
            widths[column.index()] = default_width(column);
        }
        Self { widths }
    }
}

pub const fn default_width(column: Column) -> u32 {
    match column {
        Column::Goals => 200,
        Column::Tasks => 180,
        Column::Team => 140,
        Column::Priority => 100,
        Column::Owner => 140,
        Column::Status => 120,
        Column::Eta => 110,
        Column::CompletionDate => 140,
        Column::Links => 100,
        Column::Notes => 250,
    }
}

/// In-progress drag of one column's resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub column: Column,
    pub start_x: i64,
    pub start_width: u32,
}

impl ColumnWidths {
    pub fn get(&self, column: Column) -> u32 {
        self.widths[column.index()]
    }

    /// Width in terminal cells, never narrower than one cell.
    pub fn cells(&self, column: Column) -> u16 {
        let cells = self.get(column) / PX_PER_CELL;
        u16::try_from(cells).unwrap_or(u16::MAX).max(1)
    }

    pub fn begin_resize(&self, column: Column, pointer_x: i64) -> ResizeDrag {
        ResizeDrag {
            column,
            start_x: pointer_x,
            start_width: self.get(column),
        }
    }

    /// Applies the pointer displacement since the drag started and returns the new width.
    pub fn drag_to(&mut self, drag: &ResizeDrag, pointer_x: i64) -> u32 {
        let width = i64::from(drag.start_width) + (pointer_x - drag.start_x);
        let width = clamp_width(width);
        self.widths[drag.column.index()] = width;
        width
    }

    pub fn nudge(&mut self, column: Column, delta_px: i64) -> u32 {
        let width = clamp_width(i64::from(self.get(column)) + delta_px);
        self.widths[column.index()] = width;
        width
    }
}

fn clamp_width(width: i64) -> u32 {
    u32::try_from(width.max(i64::from(MIN_COLUMN_WIDTH))).unwrap_or(u32::MAX)
}
