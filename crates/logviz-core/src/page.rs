//! Page assembly and the per-panel load state machine.
//!
//! Every panel starts in [`PanelState::Loading`] and settles exactly once into
//! `Loaded`, `NotFound` or `TransportError`. Panels settle independently, so a
//! failed report fetch never affects the sample page.

use std::fmt::Display;

use serde::Serialize;
use tracing::{debug, warn};

use crate::model::{PageIndex, Report, RunIdentity, SamplePage, SpecInfo};
use crate::pagination::{compute_nav_state, NavState};
use crate::section::{render_blob, render_spec, Panel, SectionView};
use crate::transcript::{build_tables, TableView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "snake_case")]
pub enum PanelState<T> {
    Loading,
    Loaded(T),
    /// Carries the user-visible not-found message.
    NotFound(String),
    /// The panel keeps showing its loading state.
    TransportError,
}

impl<T> PanelState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(view) => Some(view),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(view) => Some(view),
            _ => None,
        }
    }

    /// Settle a loading panel from a fetch outcome.
    ///
    /// `Ok(None)` is not-found, `Err` is a transport failure. A panel that has
    /// already settled ignores late outcomes.
    pub fn settle<S, E, N, B>(self, outcome: Result<Option<S>, E>, not_found: N, build: B) -> Self
    where
        E: Display,
        N: FnOnce() -> String,
        B: FnOnce(S) -> T,
    {
        if self.is_terminal() {
            debug!("ignoring outcome for a panel that already settled");
            return self;
        }
        match outcome {
            Ok(Some(data)) => Self::Loaded(build(data)),
            Ok(None) => {
                let message = not_found();
                debug!(message = %message, "panel data not found");
                Self::NotFound(message)
            }
            Err(e) => {
                warn!(error = %e, "fetch failed, panel stays in loading state");
                Self::TransportError
            }
        }
    }
}

/// The sample panel: navigation, transcript tables and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SamplePageView {
    pub run_id: String,
    pub sample_id: Option<String>,
    pub nav: NavState,
    pub tables: Vec<TableView>,
    pub metrics: SectionView,
}

impl SamplePageView {
    pub fn expand_all(&mut self) {
        for table in &mut self.tables {
            table.expanded = true;
        }
    }

    /// Expand the tables whose event id is listed. Returns how many matched.
    pub fn expand_events<S: AsRef<str>>(&mut self, event_ids: &[S]) -> usize {
        let mut matched = 0;
        for table in &mut self.tables {
            if event_ids.iter().any(|id| id.as_ref() == table.event_id) {
                table.expanded = true;
                matched += 1;
            }
        }
        matched
    }

    /// Flip the table at `index`; returns its new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let table = self.tables.get_mut(index)?;
        table.toggle();
        Some(table.expanded)
    }
}

/// Build the sample panel for `current`. Tables start collapsed.
pub fn build_sample_page(sample: &SamplePage, current: PageIndex) -> SamplePageView {
    SamplePageView {
        run_id: sample.page.run_id.clone(),
        sample_id: sample.page.sample_id.clone(),
        nav: compute_nav_state(current, sample.metadata.num_samples),
        tables: build_tables(&sample.page.sampling_events),
        metrics: render_blob(Panel::Metrics, sample.page.sample_metrics.as_ref()),
    }
}

pub fn page_not_found_message(run: &RunIdentity, page: PageIndex) -> String {
    format!(
        "Page not found for run_id '{}' and page_id '{}'",
        run, page
    )
}

pub fn spec_not_found_message(run: &RunIdentity) -> String {
    format!("Spec not found for run_id '{}'", run)
}

/// Everything shown for one page load of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunView {
    pub run_id: RunIdentity,
    pub page: PageIndex,
    pub title: String,
    pub sample: PanelState<SamplePageView>,
    pub final_report: PanelState<SectionView>,
    pub spec: PanelState<SectionView>,
}

impl RunView {
    /// All panels loading.
    pub fn new(run_id: RunIdentity, page: PageIndex) -> Self {
        Self {
            title: format!("Run {}", run_id),
            run_id,
            page,
            sample: PanelState::Loading,
            final_report: PanelState::Loading,
            spec: PanelState::Loading,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn settle_sample<E: Display>(&mut self, outcome: Result<Option<SamplePage>, E>) {
        let (run, page) = (&self.run_id, self.page);
        let state = std::mem::replace(&mut self.sample, PanelState::Loading);
        self.sample = state.settle(
            outcome,
            || page_not_found_message(run, page),
            |sample| build_sample_page(&sample, page),
        );
    }

    /// A missing final report renders the report placeholder.
    pub fn settle_final_report<E: Display>(&mut self, outcome: Result<Option<Report>, E>) {
        let state = std::mem::replace(&mut self.final_report, PanelState::Loading);
        self.final_report = state.settle(
            outcome,
            || Panel::FinalReport.empty_placeholder().to_string(),
            |report| render_blob(Panel::FinalReport, Some(&report)),
        );
    }

    pub fn settle_spec<E: Display>(&mut self, outcome: Result<Option<SpecInfo>, E>) {
        let run = &self.run_id;
        let state = std::mem::replace(&mut self.spec, PanelState::Loading);
        self.spec = state.settle(
            outcome,
            || spec_not_found_message(run),
            |spec| render_spec(run, &spec),
        );
    }

    pub fn is_settled(&self) -> bool {
        self.sample.is_terminal() && self.final_report.is_terminal() && self.spec.is_terminal()
    }
}
