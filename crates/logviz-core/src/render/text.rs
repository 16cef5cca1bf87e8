//! Terminal text.

use crate::model::PageIndex;
use crate::page::{PanelState, RunView, SamplePageView};
use crate::pagination::NavState;
use crate::runs::RunIndexView;
use crate::section::SectionView;
use crate::transcript::{RowShading, RowView, TableView};

const COLLAPSED: &str = "▸";
const EXPANDED: &str = "▾";
const LOADING: &str = "(loading)";

fn heading(title: &str) -> String {
    format!("== {} ==", title)
}

pub fn nav_line(nav: &NavState) -> String {
    let target = |page: Option<PageIndex>| {
        page.map(|p| p.to_string())
            .unwrap_or_else(|| "disabled".to_string())
    };
    format!(
        "{} | prev: {} | next: {}",
        nav.label,
        target(nav.prev_page()),
        target(nav.next_page())
    )
}

fn row_marker(shading: RowShading) -> &'static str {
    match shading {
        RowShading::Shaded => "░",
        RowShading::Plain => " ",
        RowShading::Sampled => "»",
    }
}

fn row_lines(row: &RowView, out: &mut Vec<String>) {
    let label = match &row.name {
        Some(name) => format!("{} ({})", row.role, name),
        None => row.role.clone(),
    };
    let mut content = row
        .content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));
    let first = content.next().unwrap_or_default();
    out.push(format!("  {} {}: {}", row_marker(row.shading), label, first));
    for line in content {
        out.push(format!("  {}   {}", row_marker(row.shading), line));
    }
}

pub fn table_lines(table: &TableView) -> Vec<String> {
    if !table.expanded {
        return vec![format!(
            "{} {} ({} rows)",
            COLLAPSED,
            table.caption,
            table.rows.len()
        )];
    }
    let mut lines = vec![format!("{} {}", EXPANDED, table.caption)];
    for row in &table.rows {
        row_lines(row, &mut lines);
    }
    lines
}

pub fn section(view: &SectionView) -> String {
    let mut lines = vec![heading(view.panel.title())];
    lines.extend(view.lines());
    lines.join("\n")
}

pub fn sample_page(view: &SamplePageView) -> String {
    let mut lines = vec![nav_line(&view.nav)];
    if let Some(sample_id) = &view.sample_id {
        lines.push(format!("Sample ID: {}", sample_id));
    }
    lines.push(String::new());
    for table in &view.tables {
        lines.extend(table_lines(table));
    }
    if !view.tables.is_empty() {
        lines.push(String::new());
    }
    lines.push(section(&view.metrics));
    lines.join("\n")
}

fn panel<T>(title: &str, state: &PanelState<T>, body: impl FnOnce(&T) -> String) -> String {
    match state {
        PanelState::Loaded(view) => body(view),
        PanelState::NotFound(message) => format!("{}\n{}", heading(title), message),
        PanelState::Loading | PanelState::TransportError => {
            format!("{}\n{}", heading(title), LOADING)
        }
    }
}

pub fn run_view(view: &RunView) -> String {
    let blocks = [
        format!("{}\n{}", view.title, "=".repeat(view.title.chars().count())),
        panel("Sample", &view.sample, |sample| {
            format!("{}\n{}", heading("Sample"), sample_page(sample))
        }),
        panel("Final Report", &view.final_report, section),
        panel("Spec", &view.spec, section),
    ];
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

pub fn run_index(index: &RunIndexView) -> String {
    if index.is_empty() {
        return "No runs found!\n".to_string();
    }
    let id_width = index
        .runs
        .iter()
        .map(|r| r.run_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("RUN ID".len());
    let eval_width = index
        .runs
        .iter()
        .map(|r| r.eval.chars().count())
        .max()
        .unwrap_or(0)
        .max("EVAL".len());

    let mut out = format!(
        "{:<id_width$}  {:<eval_width$}  {:>7}  {}\n",
        "RUN ID", "EVAL", "SAMPLES", "UPLOADED AT"
    );
    for run in &index.runs {
        out.push_str(&format!(
            "{:<id_width$}  {:<eval_width$}  {:>7}  {}\n",
            run.run_id, run.eval, run.samples, run.uploaded_at
        ));
    }
    out
}
