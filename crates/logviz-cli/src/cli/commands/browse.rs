use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use logviz_client::{load_run_title, load_sample_panel};
use logviz_core::render::text::{nav_line, table_lines};
use logviz_core::{PageIndex, PanelState, RunIdentity, SamplePageView, TableView};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::stdout;
use tracing::warn;

use crate::cli::args::{BrowseArgs, EndpointArgs};
use crate::exit_codes::SUCCESS;

struct BrowseState {
    run: RunIdentity,
    page: PageIndex,
    title: String,
    sample: PanelState<SamplePageView>,
    list_state: ListState,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
    Load(PageIndex),
}

impl BrowseState {
    fn new(
        run: RunIdentity,
        page: PageIndex,
        title: String,
        sample: PanelState<SamplePageView>,
    ) -> Self {
        let mut state = Self {
            run,
            page,
            title,
            sample: PanelState::Loading,
            list_state: ListState::default(),
        };
        state.show(page, sample);
        state
    }

    /// Replace the sample panel after a page load.
    fn show(&mut self, page: PageIndex, sample: PanelState<SamplePageView>) {
        self.page = page;
        self.sample = sample;
        let first = if self.tables().is_empty() { None } else { Some(0) };
        self.list_state.select(first);
    }

    fn tables(&self) -> &[TableView] {
        self.sample
            .loaded()
            .map(|view| view.tables.as_slice())
            .unwrap_or(&[])
    }

    fn move_selection(&mut self, delta: i64) {
        let len = self.tables().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.list_state.select(Some(next));
    }

    fn toggle_selected(&mut self) {
        let Some(index) = self.list_state.selected() else {
            return;
        };
        if let Some(view) = self.sample.loaded_mut() {
            view.toggle(index);
        }
    }

    /// Page moves follow the navigation controls; a disabled control does nothing.
    fn handle_key(&mut self, code: KeyCode) -> Action {
        let nav = self.sample.loaded().map(|view| &view.nav);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                Action::Continue
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                Action::Continue
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.toggle_selected();
                Action::Continue
            }
            KeyCode::Char('n') | KeyCode::Right => nav
                .and_then(|nav| nav.next_page())
                .map_or(Action::Continue, Action::Load),
            KeyCode::Char('p') | KeyCode::Left => nav
                .and_then(|nav| nav.prev_page())
                .map_or(Action::Continue, Action::Load),
            _ => Action::Continue,
        }
    }
}

pub async fn run(endpoint: &EndpointArgs, args: BrowseArgs) -> Result<i32> {
    let client = super::client(endpoint)?;
    let run = args.run.identity();

    let title = match load_run_title(&client, &run).await {
        Ok(Some(title)) => title,
        Ok(None) => format!("Run {}", run),
        Err(e) => {
            warn!(error = %e, "failed to load run metadata");
            format!("Run {}", run)
        }
    };
    let sample = load_sample_panel(&client, &run, args.page).await;
    let mut state = BrowseState::new(run, args.page, title, sample);

    // The event loop blocks on terminal input; page loads hop back onto the runtime.
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || {
        run_tui(&mut state, |run, page| {
            handle.block_on(load_sample_panel(&client, run, page))
        })
    })
    .await
    .context("terminal viewer task failed")??;

    Ok(SUCCESS)
}

fn run_tui<F>(state: &mut BrowseState, load: F) -> Result<()>
where
    F: FnMut(&RunIdentity, PageIndex) -> PanelState<SamplePageView>,
{
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = run_tui_inner(state, load);

    // Always restore terminal state, even if the event loop errored.
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);

    result
}

fn run_tui_inner<F>(state: &mut BrowseState, mut load: F) -> Result<()>
where
    F: FnMut(&RunIdentity, PageIndex) -> PanelState<SamplePageView>,
{
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| draw_ui(f, state))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                match state.handle_key(key.code) {
                    Action::Quit => break,
                    Action::Continue => {}
                    Action::Load(page) => {
                        state.show(page, PanelState::Loading);
                        terminal.draw(|f| draw_ui(f, state))?;
                        let sample = load(&state.run, page);
                        state.show(page, sample);
                    }
                }
            }
        }
    }

    Ok(())
}

fn draw_ui(f: &mut ratatui::Frame<'_>, state: &mut BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let header_text = match state.sample.loaded() {
        Some(view) => format!(
            " {} | {} | Sample: {} ",
            state.title,
            nav_line(&view.nav),
            view.sample_id.as_deref().unwrap_or("-")
        ),
        None => format!(" {} | Page {} ", state.title, state.page),
    };
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, chunks[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    match &state.sample {
        PanelState::Loaded(view) => {
            let items: Vec<ListItem<'_>> = view
                .tables
                .iter()
                .map(|table| {
                    let lines: Vec<Line<'_>> = table_lines(table)
                        .into_iter()
                        .map(|line| Line::from(Span::raw(line)))
                        .collect();
                    ListItem::new(lines)
                })
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(format!(" Events ({}) ", view.tables.len()))
                        .borders(Borders::ALL),
                )
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let metrics = Paragraph::new(view.metrics.lines().join("\n"))
                .block(Block::default().title(" Metrics ").borders(Borders::ALL))
                .wrap(Wrap { trim: false });

            f.render_stateful_widget(list, main_chunks[0], &mut state.list_state);
            f.render_widget(metrics, main_chunks[1]);
        }
        PanelState::NotFound(message) => {
            let body = Paragraph::new(message.as_str())
                .block(Block::default().title(" Sample ").borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            f.render_widget(body, chunks[1]);
        }
        PanelState::Loading | PanelState::TransportError => {
            let body = Paragraph::new("Loading…")
                .block(Block::default().title(" Sample ").borders(Borders::ALL));
            f.render_widget(body, chunks[1]);
        }
    }

    let status = " j/k: select | Enter/Space: expand | n/p: next/prev page | q: quit ";
    let status_bar =
        Paragraph::new(status).style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(status_bar, chunks[2]);
}
