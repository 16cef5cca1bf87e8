//! Run index: one row per uploaded run.

use serde::Serialize;

use crate::model::RunMetadata;
use crate::section::display_or_dash;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRow {
    pub run_id: String,
    pub name: String,
    pub eval: String,
    pub solvers: String,
    pub samples: u32,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunIndexView {
    pub runs: Vec<RunRow>,
}

impl RunIndexView {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Rows keep server order. Runs without an id cannot be linked and are skipped.
pub fn build_run_index(runs: &[RunMetadata]) -> RunIndexView {
    RunIndexView {
        runs: runs
            .iter()
            .filter_map(|meta| {
                let run_id = meta.run_id.as_deref().filter(|id| !id.is_empty())?;
                let eval = meta.eval_name.as_deref().or(meta.base_eval.as_deref());
                Some(RunRow {
                    run_id: run_id.to_string(),
                    name: display_or_dash(meta.name.as_deref()),
                    eval: display_or_dash(eval),
                    solvers: display_or_dash(Some(meta.completion_fns.join(", ").as_str())),
                    samples: meta.num_samples,
                    uploaded_at: display_or_dash(meta.uploaded_at.as_deref()),
                })
            })
            .collect(),
    }
}
