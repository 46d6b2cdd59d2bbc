// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use depot_app::{
    AppCommand, AppEvent, AppState, Completion, Entity, FetchRequest, FilterValue, ListQuery,
    Notice, Page, PageQuery, PageWindowMode, PendingAction, RowKey, run_batch,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const PAGE_SIZE_STEPS: [usize; 5] = [10, 20, 50, 100, 200];
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// What a list screen needs from the outside world.
pub trait ScreenRuntime<R: Entity>: Sync {
    fn fetch_page(&mut self, query: &PageQuery) -> Result<Page<R>>;
    fn delete_row(&self, key: &RowKey) -> Result<()>;

    /// Runs a named row action such as `confirm`.
    fn row_action(&self, _key: &RowKey, action: &str) -> Result<()> {
        Err(anyhow!("{action} is not available for {}", R::KIND.label()))
    }

    /// Runs the fetch and reports back through `tx`. The default is
    /// synchronous; networked runtimes move the work to a thread.
    fn spawn_fetch(&mut self, request: FetchRequest, tx: Sender<InternalEvent<R>>) -> Result<()> {
        let result = self
            .fetch_page(&request.query)
            .map_err(|error| error.to_string());
        tx.send(InternalEvent::Fetched {
            generation: request.generation,
            result,
        })
        .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent<R> {
    ClearStatus {
        token: u64,
    },
    Fetched {
        generation: u64,
        result: Result<Page<R>, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputTarget {
    Keyword,
    ClientFilter(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputState {
    target: InputTarget,
    buffer: String,
}

/// One entity list: the query engine plus cursor, prompt and status state.
pub struct Screen<R: Entity> {
    list: ListQuery<R>,
    app: AppState,
    cursor: usize,
    input: Option<InputState>,
    status_token: u64,
}

impl<R: Entity> Screen<R> {
    pub fn new(page_size: usize, page_window: PageWindowMode) -> Self {
        let app = AppState {
            screen: R::KIND,
            page_window,
            ..AppState::default()
        };
        Self {
            list: ListQuery::with_page_size(page_size),
            app,
            cursor: 0,
            input: None,
            status_token: 0,
        }
    }

    pub fn list(&self) -> &ListQuery<R> {
        &self.list
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    fn cursor_key(&self) -> Option<RowKey> {
        self.list
            .visible_rows()
            .nth(self.cursor)
            .map(Entity::row_key)
    }

    fn clamp_cursor(&mut self) {
        let visible = self.list.visible_rows().count();
        self.cursor = self.cursor.min(visible.saturating_sub(1));
    }
}

pub fn run_screen<R, T>(runtime: &mut T, screen: &mut Screen<R>) -> Result<()>
where
    R: Entity,
    T: ScreenRuntime<R>,
{
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();

    let initial = screen.list.refetch();
    issue_fetch(screen, runtime, &internal_tx, initial);

    let mut result = Ok(());
    loop {
        process_internal_events(screen, runtime, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, screen)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            if let Event::Key(key) = event::read().context("read event")?
                && handle_key_event(screen, runtime, &internal_tx, key)
            {
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn issue_fetch<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    request: FetchRequest,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    let generation = request.generation;
    if let Err(error) = runtime.spawn_fetch(request, tx.clone()) {
        let completion = screen.list.complete(generation, Err(error));
        apply_completion(screen, runtime, tx, completion);
    }
}

fn process_internal_events<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    rx: &Receiver<InternalEvent<R>>,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == screen.status_token => {
                screen.app.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched { generation, result } => {
                let completion = screen
                    .list
                    .complete(generation, result.map_err(anyhow::Error::msg));
                apply_completion(screen, runtime, tx, completion);
            }
        }
    }
}

fn apply_completion<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    completion: Completion,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    match completion {
        Completion::Applied { .. } => screen.clamp_cursor(),
        Completion::Failed(message) => {
            screen.cursor = 0;
            notify(screen, tx, Notice::error(format!("load failed: {message}")));
        }
        Completion::Stale { generation, latest } => {
            debug!(generation, latest, "ignored superseded page");
        }
        Completion::Reissued(request) => {
            screen.cursor = 0;
            issue_fetch(screen, runtime, tx, request);
        }
    }
}

fn schedule_status_clear<R: Entity>(tx: &Sender<InternalEvent<R>>, token: u64) {
    let sender = tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status<R: Entity>(
    screen: &mut Screen<R>,
    tx: &Sender<InternalEvent<R>>,
    message: impl Into<String>,
) {
    screen.app.dispatch(AppCommand::SetStatus(message.into()));
    screen.status_token = screen.status_token.saturating_add(1);
    schedule_status_clear(tx, screen.status_token);
}

fn notify<R: Entity>(screen: &mut Screen<R>, tx: &Sender<InternalEvent<R>>, notice: Notice) {
    screen.app.dispatch(AppCommand::Notify(notice));
    screen.status_token = screen.status_token.saturating_add(1);
    schedule_status_clear(tx, screen.status_token);
}

fn handle_key_event<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    key: KeyEvent,
) -> bool
where
    R: Entity,
    T: ScreenRuntime<R>,
{
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if screen.app.confirm.is_open() {
        handle_confirm_key(screen, runtime, tx, key);
        return false;
    }
    if screen.input.is_some() {
        handle_input_key(screen, runtime, tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            let visible = screen.list.visible_rows().count();
            if screen.cursor + 1 < visible {
                screen.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            screen.cursor = screen.cursor.saturating_sub(1);
        }
        KeyCode::Char('n') | KeyCode::Right => match screen.list.next_page() {
            Some(request) => issue_fetch(screen, runtime, tx, request),
            None => emit_status(screen, tx, "no next page"),
        },
        KeyCode::Char('p') | KeyCode::Left => match screen.list.prev_page() {
            Some(request) => issue_fetch(screen, runtime, tx, request),
            None => emit_status(screen, tx, "no previous page"),
        },
        KeyCode::Char('g') => {
            if let Some(request) = screen.list.go_to_page(1) {
                issue_fetch(screen, runtime, tx, request);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(key) = screen.cursor_key() {
                screen.list.toggle(&key);
            }
        }
        KeyCode::Char('a') => {
            let checked = !screen.list.is_all_selected();
            screen.list.toggle_all_visible(checked);
        }
        KeyCode::Char('/') => {
            let buffer = screen
                .list
                .server_filters()
                .get("keyword")
                .map(ToString::to_string)
                .unwrap_or_default();
            screen.input = Some(InputState {
                target: InputTarget::Keyword,
                buffer,
            });
        }
        KeyCode::Char('f') => {
            let quick_filter = screen.list.refiner().names().next();
            match quick_filter {
                Some(name) => {
                    let buffer = screen
                        .list
                        .client_filters()
                        .get(name)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    screen.input = Some(InputState {
                        target: InputTarget::ClientFilter(name),
                        buffer,
                    });
                }
                None => emit_status(screen, tx, "this list has no quick filter"),
            }
        }
        KeyCode::Char('+') => step_page_size(screen, runtime, tx, true),
        KeyCode::Char('-') => step_page_size(screen, runtime, tx, false),
        KeyCode::Char('r') => {
            let request = screen.list.refetch();
            issue_fetch(screen, runtime, tx, request);
        }
        KeyCode::Char('w') => {
            screen.app.dispatch(AppCommand::TogglePageWindow);
        }
        KeyCode::Char('d') => {
            let keys = target_keys(screen);
            if keys.is_empty() {
                emit_status(screen, tx, "nothing to delete");
            } else {
                screen.app.dispatch(AppCommand::Request(PendingAction::Delete {
                    kind: R::KIND,
                    keys,
                }));
            }
        }
        KeyCode::Char('c') => {
            let keys = target_keys(screen);
            if !R::KIND.has_confirm() {
                emit_status(screen, tx, format!("{} have no confirm step", R::KIND.label()));
            } else if keys.is_empty() {
                emit_status(screen, tx, "nothing to confirm");
            } else {
                screen.app.dispatch(AppCommand::Request(PendingAction::Confirm {
                    kind: R::KIND,
                    keys,
                }));
            }
        }
        _ => {}
    }
    false
}

/// Selected rows, or the row under the cursor when nothing is selected.
fn target_keys<R: Entity>(screen: &Screen<R>) -> Vec<RowKey> {
    let mut keys = screen.list.selected_keys();
    if keys.is_empty() {
        keys.extend(screen.cursor_key());
    }
    keys
}

fn handle_confirm_key<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    key: KeyEvent,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let events = screen.app.dispatch(AppCommand::ConfirmPending);
            for event in events {
                if let AppEvent::Confirmed(action) = event {
                    run_pending(screen, runtime, tx, &action);
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            screen.app.dispatch(AppCommand::CancelPending);
        }
        _ => {}
    }
}

fn run_pending<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    action: &PendingAction,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    let keys = action.keys();
    let mut notices = Vec::new();
    {
        let shared: &T = runtime;
        run_batch(
            action.verb(),
            &keys,
            |key| match action {
                PendingAction::Delete { .. } => shared.delete_row(key),
                PendingAction::Confirm { .. } => shared.row_action(key, "confirm"),
                PendingAction::Adjust(_) => Err(anyhow!(
                    "adjustments need a quantity and reason; run `depot adjust`"
                )),
            },
            |notice| notices.push(notice),
        );
    }
    for notice in notices {
        notify(screen, tx, notice);
    }
    let request = screen.list.refetch();
    issue_fetch(screen, runtime, tx, request);
}

fn handle_input_key<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    key: KeyEvent,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    let Some(input) = screen.input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => screen.input = None,
        KeyCode::Backspace => {
            input.buffer.pop();
        }
        KeyCode::Char(ch) => input.buffer.push(ch),
        KeyCode::Enter => {
            let Some(input) = screen.input.take() else {
                return;
            };
            let value = Some(FilterValue::text(input.buffer));
            match input.target {
                InputTarget::Keyword => match screen.list.set_server_filter("keyword", value) {
                    Ok(request) => {
                        screen.cursor = 0;
                        issue_fetch(screen, runtime, tx, request);
                    }
                    Err(error) => emit_status(screen, tx, error.to_string()),
                },
                InputTarget::ClientFilter(name) => {
                    if let Err(error) = screen.list.set_client_filter(name, value) {
                        emit_status(screen, tx, error.to_string());
                    }
                    screen.clamp_cursor();
                }
            }
        }
        _ => {}
    }
}

fn step_page_size<R, T>(
    screen: &mut Screen<R>,
    runtime: &mut T,
    tx: &Sender<InternalEvent<R>>,
    grow: bool,
) where
    R: Entity,
    T: ScreenRuntime<R>,
{
    let current = screen.list.page_size();
    let next = if grow {
        PAGE_SIZE_STEPS.iter().copied().find(|size| *size > current)
    } else {
        PAGE_SIZE_STEPS
            .iter()
            .rev()
            .copied()
            .find(|size| *size < current)
    };
    let Some(size) = next else {
        emit_status(screen, tx, format!("page size stays at {current}"));
        return;
    };
    if let Some(request) = screen.list.set_page_size(size) {
        screen.cursor = 0;
        emit_status(screen, tx, format!("page size {size}"));
        issue_fetch(screen, runtime, tx, request);
    }
}

pub fn page_window_text<R: Entity>(list: &ListQuery<R>, mode: PageWindowMode) -> String {
    let pages = list.page_window(mode);
    let mut parts = pages
        .iter()
        .map(|page| {
            if *page == list.page() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>();
    if let (Some(first), Some(last)) = (pages.first(), pages.last()) {
        if *first > 1 {
            parts.insert(0, "…".to_owned());
        }
        if *last < list.total_pages() {
            parts.push("…".to_owned());
        }
    }
    parts.join(" ")
}

pub fn range_text<R: Entity>(list: &ListQuery<R>) -> String {
    format!(
        "rows {}-{} of {}",
        list.from_index(),
        list.to_index(),
        list.total_items()
    )
}

fn header_text<R: Entity>(screen: &Screen<R>) -> String {
    let mut parts = vec![R::KIND.label().to_owned()];
    let server = screen.list.server_filters().describe();
    if !server.is_empty() {
        parts.push(format!("server: {server}"));
    }
    let client = screen.list.client_filters().describe();
    if !client.is_empty() {
        parts.push(format!("page: {client}"));
    }
    let selected = screen.list.selection().len();
    if selected > 0 {
        parts.push(format!("{selected} selected"));
    }
    parts.join(" | ")
}

fn status_text<R: Entity>(screen: &Screen<R>) -> String {
    if let Some(input) = &screen.input {
        let label = match input.target {
            InputTarget::Keyword => "keyword",
            InputTarget::ClientFilter(name) => name,
        };
        return format!("{label}: {}_ | enter apply | esc cancel", input.buffer);
    }
    if let Some(action) = screen.app.confirm.pending() {
        return action.prompt();
    }

    let loading = if screen.list.is_loading() {
        " | loading"
    } else {
        ""
    };
    let position = format!(
        "{} | {}{loading}",
        page_window_text(&screen.list, screen.app.page_window),
        range_text(&screen.list)
    );
    let hints = if R::KIND.has_confirm() {
        "j/k n/p g space a / f +/- r w d c q"
    } else {
        "j/k n/p g space a / f +/- r w d q"
    };
    match &screen.app.status_line {
        Some(status) => format!("{position} | {status} | {hints}"),
        None => format!("{position} | {hints}"),
    }
}

fn render<R: Entity>(frame: &mut ratatui::Frame<'_>, screen: &Screen<R>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(screen))
        .block(Block::default().title("depot").borders(Borders::ALL))
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], screen);

    let status = Paragraph::new(status_text(screen))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if let Some(action) = screen.app.confirm.pending() {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(action.prompt()).block(
            Block::default()
                .title("confirm")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(dialog, area);
    }
}

fn render_table<R: Entity>(frame: &mut ratatui::Frame<'_>, area: Rect, screen: &Screen<R>) {
    let title = match screen.list.last_error() {
        Some(error) => format!("{} (error: {error})", R::KIND.label()),
        None => R::KIND.label().to_owned(),
    };

    let header_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let mut header_cells = vec![Cell::from(screen.list.selection_state().marker())];
    header_cells.extend(
        R::COLUMNS
            .iter()
            .map(|label| Cell::from(*label).style(header_style)),
    );

    let rows = screen
        .list
        .visible_rows()
        .enumerate()
        .map(|(index, row)| {
            let marker = if screen.list.is_selected(&row.row_key()) {
                "[x]"
            } else {
                "[ ]"
            };
            let style = if index == screen.cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            let mut cells = vec![Cell::from(marker)];
            cells.extend(row.cells().into_iter().map(Cell::from));
            Row::new(cells).style(style)
        })
        .collect::<Vec<_>>();

    let mut widths = vec![Constraint::Length(3)];
    widths.extend(R::COLUMNS.iter().map(|_| Constraint::Min(8)));

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
