use std::io::Write;
use std::path::Path;

use anyhow::Context;
use logviz_core::render::{render, Render};
use logviz_core::SamplePageView;
use tracing::info;

use crate::cli::args::{ExpandArgs, OutputArgs};

/// Render `view` in the requested format and write it out.
pub fn emit<R: Render>(view: &R, output: &OutputArgs) -> anyhow::Result<()> {
    let format = output.format.into();
    let rendered = render(view, format).context("failed to serialize view")?;
    write_output(&rendered, output.out.as_deref())
}

pub fn write_output(rendered: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = rendered.len(), "wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Apply `--expand-all` / `--expand` to a freshly built page.
pub fn apply_expansion(view: &mut SamplePageView, expand: &ExpandArgs) {
    if expand.expand_all {
        view.expand_all();
        return;
    }
    if expand.expand.is_empty() {
        return;
    }
    let matched = view.expand_events(&expand.expand);
    if matched < expand.expand.len() {
        tracing::warn!(
            requested = expand.expand.len(),
            matched,
            "some event ids are not on this page"
        );
    }
}
