//! One collapsible table per sampling event.

use serde::Serialize;

use crate::model::SamplingEvent;

pub const HEADER: [&str; 2] = ["Role", "Content"];

/// Role label of the synthetic completion row.
pub const SAMPLED_ROLE: &str = "Sampled";

/// Visual class of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowShading {
    /// Class A, used when `(event_index + prompt_index)` is even.
    Shaded,
    Plain,
    /// Highlighted completion row.
    Sampled,
}

impl RowShading {
    /// Shading continues across events instead of restarting at each table.
    pub fn for_position(event_index: usize, prompt_index: usize) -> Self {
        if (event_index % 2 + prompt_index % 2) % 2 == 0 {
            Self::Shaded
        } else {
            Self::Plain
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Shaded => "row-shaded",
            Self::Plain => "row-plain",
            Self::Sampled => "row-sampled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub role: String,
    /// Verbatim, whitespace and line breaks included.
    pub content: String,
    pub name: Option<String>,
    pub shading: RowShading,
}

impl RowView {
    pub fn is_sampled(&self) -> bool {
        self.shading == RowShading::Sampled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub event_id: String,
    pub caption: String,
    pub header: [&'static str; 2],
    pub rows: Vec<RowView>,
    /// Body visibility; tables start collapsed.
    pub expanded: bool,
}

impl TableView {
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// The final row, always present.
    pub fn sampled_row(&self) -> Option<&RowView> {
        self.rows.last().filter(|row| row.is_sampled())
    }
}

/// Build the table for the event at `event_index` on its page.
pub fn build_table(event: &SamplingEvent, event_index: usize) -> TableView {
    let mut rows: Vec<RowView> = event
        .data
        .prompt
        .iter()
        .enumerate()
        .map(|(prompt_index, turn)| RowView {
            role: turn.role.clone(),
            content: turn.content.clone(),
            name: turn.name.clone(),
            shading: RowShading::for_position(event_index, prompt_index),
        })
        .collect();

    rows.push(RowView {
        role: SAMPLED_ROLE.to_string(),
        content: event.data.sampled.clone(),
        name: None,
        shading: RowShading::Sampled,
    });

    TableView {
        event_id: event.event_id.clone(),
        caption: format!("Event ID: {}", event.event_id),
        header: HEADER,
        rows,
        expanded: false,
    }
}

/// Build tables for every event, in order.
pub fn build_tables(events: &[SamplingEvent]) -> Vec<TableView> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| build_table(event, index))
        .collect()
}
