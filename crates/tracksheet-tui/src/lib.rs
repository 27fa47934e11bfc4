// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use log::{error, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracksheet_app::{
    Column, ColumnWidths, FacetSet, FeedChange, FeedEvent, FeedRequest, FilterChoice,
    FilterField, KnownStatus, PX_PER_CELL, ProgramFeed, ProgramRecord, ResizeDrag,
    SortDirection, SortState, StatusSummary, ViewCommand, ViewEvent, ViewState,
    format_sheet_date,
};

const LINK_ARROW: &str = "↗";
const SORT_ASC_MARK: &str = "↑";
const SORT_DESC_MARK: &str = "↓";
const SORT_NEUTRAL_MARK: &str = "↕";
const RESIZE_HANDLE: &str = "│";
const SEARCH_CURSOR: &str = "▏";
const SUMMARY_SEPARATOR: &str = " │ ";
const ORANGE: Color = Color::Rgb(255, 140, 0);

/// Where the dashboard reads records and facets from.
pub trait ProgramSource: Clone + Send + 'static {
    fn fetch_programs(&self) -> Result<Vec<ProgramRecord>>;
    fn fetch_filter_options(&self) -> Result<FacetSet>;

    /// Runs one request on its own thread and reports the outcome on `tx`.
    fn spawn_request(&self, request: FeedRequest, tx: Sender<InternalEvent>) {
        let source = self.clone();
        thread::spawn(move || {
            let event = match request {
                FeedRequest::Programs => FeedEvent::ProgramsLoaded(
                    source
                        .fetch_programs()
                        .map_err(|error| format!("{error:#}")),
                ),
                FeedRequest::FilterOptions => FeedEvent::FilterOptionsLoaded(
                    source
                        .fetch_filter_options()
                        .map_err(|error| format!("{error:#}")),
                ),
            };
            let _ = tx.send(InternalEvent::Feed(event));
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Feed(FeedEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DashboardCommand {
    Quit,
    MoveRow(isize),
    MoveColumn(isize),
    JumpFirstRow,
    JumpLastRow,
    EditSearch,
    CycleFilter(FilterField),
    QuickStatus(Option<KnownStatus>),
    ClearFilters,
    ToggleSort,
    Resize(i64),
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DashboardStatus {
    SortAsc(&'static str),
    SortDesc(&'static str),
    SortCleared,
    Filter(FilterField, FilterChoice),
    FiltersCleared,
    NothingToClear,
    SearchEditing,
    Width(&'static str, u32),
    Refreshing,
    LoadFailed(String),
}

impl DashboardStatus {
    fn message(self) -> String {
        match self {
            Self::SortAsc(column) => format!("sort {column} asc"),
            Self::SortDesc(column) => format!("sort {column} desc"),
            Self::SortCleared => "sort cleared".to_owned(),
            Self::Filter(field, choice) => format!("{} filter: {}", field.label(), choice.as_str()),
            Self::FiltersCleared => "filters cleared".to_owned(),
            Self::NothingToClear => "no filters to clear".to_owned(),
            Self::SearchEditing => "search: type to filter, enter/esc to finish".to_owned(),
            Self::Width(column, width) => format!("width {column} {width}px"),
            Self::Refreshing => "refreshing".to_owned(),
            Self::LoadFailed(error) => format!("load failed: {error}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MouseHitRegion {
    SummaryEntry(Option<KnownStatus>),
    Header(Column),
    ResizeHandle(Column),
    Row(usize),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnSlot {
    column: Column,
    x: u16,
    width: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenLayout {
    summary: Rect,
    filters: Rect,
    table: Rect,
    status: Rect,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    feed: ProgramFeed,
    view: ViewState,
    widths: ColumnWidths,
    drag: Option<ResizeDrag>,
    visible: Vec<ProgramRecord>,
    selected_row: usize,
    selected_col: usize,
    first_col: usize,
    search_editing: bool,
    status_line: Option<String>,
    status_token: u64,
    viewport: Rect,
}

pub fn run_app<S: ProgramSource>(source: &S) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let requests = view_data.feed.mount();
    issue_requests(source, requests, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(&mut view_data, &internal_tx, &internal_rx);

        let mut viewport = view_data.viewport;
        if let Err(error) = terminal.draw(|frame| {
            viewport = frame.area();
            render(frame, &view_data);
        }) {
            result = Err(error).context("draw frame");
            break;
        }
        if viewport != view_data.viewport {
            view_data.viewport = viewport;
            ensure_column_visible(&mut view_data);
        }

        match next_event() {
            Ok(Some(Event::Key(key))) => {
                if handle_key_event(source, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(Some(Event::Mouse(mouse))) => {
                handle_mouse_event(&mut view_data, &internal_tx, mouse);
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

fn next_event() -> Result<Option<Event>> {
    if !event::poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(None);
    }
    event::read().context("read event").map(Some)
}

fn issue_requests<S: ProgramSource>(
    source: &S,
    requests: Vec<FeedRequest>,
    internal_tx: &Sender<InternalEvent>,
) {
    for request in requests {
        source.spawn_request(request, internal_tx.clone());
    }
}

fn process_internal_events(
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Feed(event) => handle_feed_event(view_data, tx, event),
        }
    }
}

fn handle_feed_event(view_data: &mut ViewData, tx: &Sender<InternalEvent>, event: FeedEvent) {
    match view_data.feed.apply(event) {
        FeedChange::ProgramsReplaced(count) => {
            info!("loaded {count} programs");
            refresh_visible(view_data);
        }
        FeedChange::ProgramsFailed(message) => {
            error!("fetch programs: {message}");
            emit_status(view_data, tx, DashboardStatus::LoadFailed(message));
        }
        FeedChange::FilterOptionsReplaced => {}
        FeedChange::FilterOptionsFailed(message) => {
            warn!("fetch filter options: {message}");
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    status: DashboardStatus,
) {
    view_data.status_line = Some(status.message());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<S: ProgramSource>(
    source: &S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    if view_data.search_editing {
        handle_search_key(view_data, internal_tx, key);
        return false;
    }
    match dashboard_command_for_key(key) {
        Some(command) => apply_dashboard_command(source, view_data, internal_tx, command),
        None => false,
    }
}

fn handle_search_key(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => view_data.search_editing = false,
        KeyCode::Backspace => apply_view_command(view_data, internal_tx, ViewCommand::PopSearchChar),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            apply_view_command(view_data, internal_tx, ViewCommand::PushSearchChar(ch));
        }
        _ => {}
    }
}

fn dashboard_command_for_key(key: KeyEvent) -> Option<DashboardCommand> {
    match key.code {
        KeyCode::Char('q') => Some(DashboardCommand::Quit),
        KeyCode::Char('j') | KeyCode::Down => Some(DashboardCommand::MoveRow(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(DashboardCommand::MoveRow(-1)),
        KeyCode::Char('h') | KeyCode::Left => Some(DashboardCommand::MoveColumn(-1)),
        KeyCode::Char('l') | KeyCode::Right => Some(DashboardCommand::MoveColumn(1)),
        KeyCode::Char('g') => Some(DashboardCommand::JumpFirstRow),
        KeyCode::Char('G') => Some(DashboardCommand::JumpLastRow),
        KeyCode::Char('/') => Some(DashboardCommand::EditSearch),
        KeyCode::Char('1') => Some(DashboardCommand::CycleFilter(FilterField::Status)),
        KeyCode::Char('2') => Some(DashboardCommand::CycleFilter(FilterField::Priority)),
        KeyCode::Char('3') => Some(DashboardCommand::CycleFilter(FilterField::Team)),
        KeyCode::Char('4') => Some(DashboardCommand::CycleFilter(FilterField::Owner)),
        KeyCode::Char('T') => Some(DashboardCommand::QuickStatus(None)),
        KeyCode::Char('I') => Some(DashboardCommand::QuickStatus(Some(KnownStatus::InProgress))),
        KeyCode::Char('O') => Some(DashboardCommand::QuickStatus(Some(KnownStatus::Ongoing))),
        KeyCode::Char('P') => Some(DashboardCommand::QuickStatus(Some(KnownStatus::ToBePicked))),
        KeyCode::Char('C') => Some(DashboardCommand::QuickStatus(Some(KnownStatus::Completed))),
        KeyCode::Char('x') => Some(DashboardCommand::ClearFilters),
        KeyCode::Char('s') => Some(DashboardCommand::ToggleSort),
        KeyCode::Char('<') => Some(DashboardCommand::Resize(-1)),
        KeyCode::Char('>') => Some(DashboardCommand::Resize(1)),
        KeyCode::Char('r') => Some(DashboardCommand::Refresh),
        _ => None,
    }
}

fn apply_dashboard_command<S: ProgramSource>(
    source: &S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: DashboardCommand,
) -> bool {
    match command {
        DashboardCommand::Quit => return true,
        DashboardCommand::MoveRow(delta) => move_row(view_data, delta),
        DashboardCommand::MoveColumn(delta) => move_col(view_data, delta),
        DashboardCommand::JumpFirstRow => view_data.selected_row = 0,
        DashboardCommand::JumpLastRow => {
            view_data.selected_row = view_data.visible.len().saturating_sub(1);
        }
        DashboardCommand::EditSearch => {
            view_data.search_editing = true;
            emit_status(view_data, internal_tx, DashboardStatus::SearchEditing);
        }
        DashboardCommand::CycleFilter(field) => {
            apply_view_command(view_data, internal_tx, ViewCommand::CycleFilter(field));
        }
        DashboardCommand::QuickStatus(status) => {
            apply_view_command(view_data, internal_tx, ViewCommand::QuickStatus(status));
        }
        DashboardCommand::ClearFilters => {
            if view_data.view.has_active_filters() {
                apply_view_command(view_data, internal_tx, ViewCommand::ClearFilters);
            } else {
                emit_status(view_data, internal_tx, DashboardStatus::NothingToClear);
            }
        }
        DashboardCommand::ToggleSort => {
            let column = selected_column(view_data);
            apply_view_command(view_data, internal_tx, ViewCommand::ToggleSort(column));
        }
        DashboardCommand::Resize(cells) => {
            let column = selected_column(view_data);
            let width = view_data
                .widths
                .nudge(column, cells * i64::from(PX_PER_CELL));
            ensure_column_visible(view_data);
            emit_status(
                view_data,
                internal_tx,
                DashboardStatus::Width(column.label(), width),
            );
        }
        DashboardCommand::Refresh => {
            let requests = view_data.feed.refresh();
            issue_requests(source, requests, internal_tx);
            emit_status(view_data, internal_tx, DashboardStatus::Refreshing);
        }
    }
    false
}

fn apply_view_command(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: ViewCommand,
) {
    let events = view_data
        .view
        .dispatch(command, &view_data.feed.filter_options);
    if events.is_empty() {
        return;
    }
    refresh_visible(view_data);
    if let Some(status) = events.into_iter().filter_map(status_for_view_event).last() {
        emit_status(view_data, internal_tx, status);
    }
}

fn status_for_view_event(event: ViewEvent) -> Option<DashboardStatus> {
    match event {
        ViewEvent::SearchChanged(_) => None,
        ViewEvent::FilterChanged(field, choice) => Some(DashboardStatus::Filter(field, choice)),
        ViewEvent::FiltersCleared => Some(DashboardStatus::FiltersCleared),
        ViewEvent::SortChanged(sort) => Some(sort_status(sort)),
    }
}

fn sort_status(sort: SortState) -> DashboardStatus {
    match (sort.column, sort.direction) {
        (Some(column), SortDirection::Asc) => DashboardStatus::SortAsc(column.label()),
        (Some(column), SortDirection::Desc) => DashboardStatus::SortDesc(column.label()),
        _ => DashboardStatus::SortCleared,
    }
}

fn handle_mouse_event(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
) {
    let pointer_x = i64::from(mouse.column) * i64::from(PX_PER_CELL);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            view_data.drag = None;
            match hit_test(view_data, mouse.column, mouse.row) {
                MouseHitRegion::ResizeHandle(column) => {
                    view_data.drag = Some(view_data.widths.begin_resize(column, pointer_x));
                }
                MouseHitRegion::Header(column) => {
                    view_data.selected_col = column.index();
                    apply_view_command(view_data, internal_tx, ViewCommand::ToggleSort(column));
                }
                MouseHitRegion::Row(index) => view_data.selected_row = index,
                MouseHitRegion::SummaryEntry(status) => {
                    apply_view_command(view_data, internal_tx, ViewCommand::QuickStatus(status));
                }
                MouseHitRegion::None => {}
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(drag) = view_data.drag {
                view_data.widths.drag_to(&drag, pointer_x);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(drag) = view_data.drag.take() {
                let width = view_data.widths.get(drag.column);
                ensure_column_visible(view_data);
                emit_status(
                    view_data,
                    internal_tx,
                    DashboardStatus::Width(drag.column.label(), width),
                );
            }
        }
        MouseEventKind::ScrollDown => move_row(view_data, 1),
        MouseEventKind::ScrollUp => move_row(view_data, -1),
        _ => {}
    }
}

fn hit_test(view_data: &ViewData, x: u16, y: u16) -> MouseHitRegion {
    let layout = screen_layout(view_data.viewport);
    if let Some(status) = summary_hit(view_data, layout.summary, x, y) {
        return MouseHitRegion::SummaryEntry(status);
    }

    let inner = inner_rect(layout.table);
    if !table_shows_rows(view_data) || !inner.contains(Position { x, y }) {
        return MouseHitRegion::None;
    }

    if y == inner.y {
        return column_slots(view_data, inner)
            .into_iter()
            .find(|slot| x >= slot.x && x < slot.x + slot.width)
            .map_or(MouseHitRegion::None, |slot| {
                if x == slot.x + slot.width - 1 {
                    MouseHitRegion::ResizeHandle(slot.column)
                } else {
                    MouseHitRegion::Header(slot.column)
                }
            });
    }

    let offset = row_offset(view_data.selected_row, body_height(inner));
    let index = offset + usize::from(y - inner.y - 1);
    if index < view_data.visible.len() {
        MouseHitRegion::Row(index)
    } else {
        MouseHitRegion::None
    }
}

/// `Some(None)` is the total entry; `None` means the click missed the strip.
fn summary_hit(view_data: &ViewData, area: Rect, x: u16, y: u16) -> Option<Option<KnownStatus>> {
    let inner = inner_rect(area);
    if !inner.contains(Position { x, y }) || y != inner.y {
        return None;
    }
    let summary = StatusSummary::from_records(&view_data.feed.programs);
    let separator = SUMMARY_SEPARATOR.chars().count();
    let offset = usize::from(x - inner.x);
    let mut start = 0;
    for (status, text) in summary_entries(&summary) {
        let end = start + text.chars().count();
        if (start..end).contains(&offset) {
            return Some(status);
        }
        start = end + separator;
    }
    None
}

fn selected_column(view_data: &ViewData) -> Column {
    Column::ALL[view_data.selected_col.min(Column::ALL.len() - 1)]
}

fn refresh_visible(view_data: &mut ViewData) {
    view_data.visible = view_data.view.apply(&view_data.feed.programs);
    view_data.selected_row = view_data
        .selected_row
        .min(view_data.visible.len().saturating_sub(1));
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let row_count = view_data.visible.len();
    if row_count == 0 {
        view_data.selected_row = 0;
        return;
    }

    let current = view_data.selected_row;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_row = next.min(row_count - 1);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let current = view_data.selected_col;
    let next = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    view_data.selected_col = next.min(Column::ALL.len() - 1);
    ensure_column_visible(view_data);
}

/// Scrolls horizontally so the selected column starts inside the table.
fn ensure_column_visible(view_data: &mut ViewData) {
    if view_data.selected_col < view_data.first_col {
        view_data.first_col = view_data.selected_col;
    }
    let available = u32::from(inner_rect(screen_layout(view_data.viewport).table).width);
    if available == 0 {
        return;
    }
    while view_data.first_col < view_data.selected_col {
        let span = Column::ALL[view_data.first_col..=view_data.selected_col]
            .iter()
            .map(|column| u32::from(view_data.widths.cells(*column)) + 1)
            .sum::<u32>()
            - 1;
        if span <= available {
            break;
        }
        view_data.first_col += 1;
    }
}

fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);
    ScreenLayout {
        summary: chunks[0],
        filters: chunks[1],
        table: chunks[2],
        status: chunks[3],
    }
}

fn inner_rect(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

fn column_slots(view_data: &ViewData, inner: Rect) -> Vec<ColumnSlot> {
    let right = inner.x.saturating_add(inner.width);
    let mut slots = Vec::new();
    let mut x = inner.x;
    for column in Column::ALL.into_iter().skip(view_data.first_col) {
        if x >= right {
            break;
        }
        let width = view_data.widths.cells(column).min(right - x);
        slots.push(ColumnSlot { column, x, width });
        x = x.saturating_add(width).saturating_add(1);
    }
    slots
}

fn body_height(inner: Rect) -> usize {
    usize::from(inner.height.saturating_sub(1))
}

fn row_offset(selected_row: usize, body_height: usize) -> usize {
    if body_height == 0 {
        return selected_row;
    }
    (selected_row + 1).saturating_sub(body_height)
}

fn table_shows_rows(view_data: &ViewData) -> bool {
    !view_data.feed.loading() && view_data.feed.error.is_none()
}

fn render(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let layout = screen_layout(frame.area());

    let summary = Paragraph::new(summary_line(view_data))
        .block(Block::default().title("tracksheet").borders(Borders::ALL));
    frame.render_widget(summary, layout.summary);

    let filters = Paragraph::new(filters_text(view_data))
        .block(Block::default().title("filters").borders(Borders::ALL));
    frame.render_widget(filters, layout.filters);

    render_table(frame, layout.table, view_data);

    let status = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout.status);
}

fn summary_entries(summary: &StatusSummary) -> Vec<(Option<KnownStatus>, String)> {
    let mut entries = vec![(None, format!("Total {}", summary.total))];
    entries.extend(KnownStatus::ALL.into_iter().map(|status| {
        (
            Some(status),
            format!("{} {}", status.label(), summary.count(status)),
        )
    }));
    entries
}

fn summary_line(view_data: &ViewData) -> Line<'static> {
    let summary = StatusSummary::from_records(&view_data.feed.programs);
    let mut spans = Vec::new();
    for (index, (status, text)) in summary_entries(&summary).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(
                SUMMARY_SEPARATOR,
                Style::default().fg(Color::DarkGray),
            ));
        }
        let selected = match status {
            None => view_data.view.status == FilterChoice::All,
            Some(status) => view_data.view.status.as_str() == status.as_str(),
        };
        let mut style = status
            .and_then(|status| status_color(status.as_str()))
            .map_or_else(Style::default, |color| Style::default().fg(color));
        if selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}

fn filters_text(view_data: &ViewData) -> String {
    let cursor = if view_data.search_editing {
        SEARCH_CURSOR
    } else {
        ""
    };
    let mut parts = vec![format!("/ search: {}{cursor}", view_data.view.search)];
    parts.extend(FilterField::ALL.into_iter().enumerate().map(|(index, field)| {
        format!(
            "{} {}: {}",
            index + 1,
            field.label(),
            view_data.view.filter(field).as_str()
        )
    }));
    parts.push(format!(
        "showing {} of {}",
        view_data.visible.len(),
        view_data.feed.programs.len()
    ));
    if view_data.view.has_active_filters() {
        parts.push("x clear".to_owned());
    }
    parts.join(" | ")
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let block = Block::default()
        .title(table_title(view_data))
        .borders(Borders::ALL);

    if view_data.feed.loading() {
        let loading = Paragraph::new("Loading programs data...")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(message) = &view_data.feed.error {
        let banner = Paragraph::new(vec![
            Line::styled(
                "Error loading data",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Line::raw(message.clone()),
            Line::raw(""),
            Line::raw("press r to retry"),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(banner, area);
        return;
    }

    let inner = block.inner(area);
    let slots = column_slots(view_data, inner);
    let widths = slots
        .iter()
        .map(|slot| Constraint::Length(slot.width))
        .collect::<Vec<_>>();
    let header = Row::new(slots.iter().map(|slot| header_cell(view_data, *slot)));

    let height = body_height(inner);
    let offset = row_offset(view_data.selected_row, height);
    let rows = view_data
        .visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(row_index, program)| {
            let selected_row = row_index == view_data.selected_row;
            let cells = slots
                .iter()
                .map(|slot| {
                    let (text, mut style) = cell_content(program, slot.column);
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && slot.column.index() == view_data.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(text).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .flex(Flex::Start)
        .block(block);
    frame.render_widget(table, area);
}

fn table_title(view_data: &ViewData) -> String {
    let base = format!(
        "programs ({}/{})",
        view_data.visible.len(),
        view_data.feed.programs.len()
    );
    match sort_status(view_data.view.sort) {
        DashboardStatus::SortCleared => base,
        status => format!("{base} {}", status.message()),
    }
}

fn header_label(column: Column, sort: SortState) -> String {
    let mark = match sort.direction_for(column) {
        SortDirection::Asc => SORT_ASC_MARK,
        SortDirection::Desc => SORT_DESC_MARK,
        SortDirection::None => SORT_NEUTRAL_MARK,
    };
    format!("{} {mark}", column.label())
}

/// Header text padded to the column, with the last cell reserved for the resize handle.
fn header_cell(view_data: &ViewData, slot: ColumnSlot) -> Cell<'static> {
    let label = header_label(slot.column, view_data.view.sort);
    let text = fit_width(&label, usize::from(slot.width.saturating_sub(1)));
    let handle_color = if view_data
        .drag
        .is_some_and(|drag| drag.column == slot.column)
    {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    Cell::from(Line::from(vec![
        Span::styled(
            text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(RESIZE_HANDLE, Style::default().fg(handle_color)),
    ]))
}

fn fit_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut chars = value.chars();
    let mut fitted: String = chars.by_ref().take(width).collect();
    if chars.next().is_some() {
        fitted.pop();
        fitted.push('…');
    }
    let padding = width.saturating_sub(fitted.chars().count());
    fitted.extend(std::iter::repeat_n(' ', padding));
    fitted
}

fn cell_content(program: &ProgramRecord, column: Column) -> (String, Style) {
    let raw = program.text(column);
    match column {
        Column::Eta | Column::CompletionDate => {
            (format_sheet_date(raw), Style::default().fg(Color::Gray))
        }
        Column::Links => {
            let text = if raw.trim().is_empty() {
                String::new()
            } else {
                LINK_ARROW.to_owned()
            };
            (text, Style::default().fg(Color::Cyan))
        }
        Column::Priority => (single_line(raw), colored(priority_color(raw))),
        Column::Status => (single_line(raw), colored(status_color(raw))),
        Column::Tasks | Column::Notes => (single_line(raw), Style::default().fg(Color::Gray)),
        Column::Goals | Column::Team | Column::Owner => (single_line(raw), Style::default()),
    }
}

fn single_line(value: &str) -> String {
    value.lines().collect::<Vec<_>>().join(" ")
}

fn colored(color: Option<Color>) -> Style {
    color.map_or_else(Style::default, |color| Style::default().fg(color))
}

fn priority_color(priority: &str) -> Option<Color> {
    match priority {
        "P0" | "Critical" => Some(Color::Red),
        "P1" | "High" => Some(ORANGE),
        "P2" | "Medium" => Some(Color::Yellow),
        "Low" => Some(Color::DarkGray),
        _ => None,
    }
}

fn status_color(status: &str) -> Option<Color> {
    match status {
        "In Progress" => Some(Color::Blue),
        "To be picked" | "To be started" => Some(ORANGE),
        "Ongoing" => Some(Color::Magenta),
        "Completed" => Some(Color::Green),
        _ => None,
    }
}

fn status_text(view_data: &ViewData) -> String {
    let mode = if view_data.search_editing {
        "SEARCH"
    } else {
        "NAV"
    };
    let default = "j/k/h/l g/G | / search | 1-4 filter | T/I/O/P/C status | x | s sort | </> width | r refresh | q";
    let mut parts = vec![mode.to_owned()];
    if let Some(status) = &view_data.status_line {
        parts.push(status.clone());
    }
    if let Some(link) = selected_link(view_data) {
        parts.push(format!("link {link}"));
    }
    parts.push(default.to_owned());
    parts.join(" | ")
}

fn selected_link(view_data: &ViewData) -> Option<&str> {
    if selected_column(view_data) != Column::Links {
        return None;
    }
    let link = view_data.visible.get(view_data.selected_row)?.links.trim();
    (!link.is_empty()).then_some(link)
}
