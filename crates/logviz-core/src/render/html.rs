//! HTML documents. All user-supplied text goes through [`escape_html`].

use url::form_urlencoded;

use super::Render;
use crate::model::PageIndex;
use crate::page::{PanelState, RunView, SamplePageView};
use crate::pagination::NavState;
use crate::runs::RunIndexView;
use crate::section::{SectionBody, SectionView};
use crate::transcript::{RowView, TableView};

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 2rem auto; padding: 0 1rem; }
h2 { border-bottom: 1px solid #ddd; padding-bottom: 0.25rem; }
nav.pagination { display: flex; gap: 1rem; align-items: center; margin: 1rem 0; }
nav.pagination .disabled { color: #aaa; cursor: default; }
details.event { margin: 0.5rem 0; border: 1px solid #e5e7eb; border-radius: 4px; }
details.event summary { cursor: pointer; padding: 0.4rem 0.6rem; font-weight: 600; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; vertical-align: top; padding: 0.4rem 0.6rem; }
td.content { white-space: pre-wrap; font-family: ui-monospace, monospace; }
.row-shaded { background: #f3f4f6; }
.row-plain { background: #ffffff; }
.row-sampled { background: #bfdbfe; }
.fields { list-style: none; padding-left: 0; }
.fields .key { font-weight: 600; }
.loading { color: #888; font-style: italic; }
.not-found { color: #b45309; }
";

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Relative link to a page of a run.
pub fn page_href(run_id: &str, page: PageIndex) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("run_id", run_id)
        .append_pair("page_id", &page.to_string())
        .finish();
    format!("?{}", query)
}

fn document(title: &str, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head><body>\n");
    html.push_str(body);
    html.push_str("</body></html>\n");
    html
}

pub fn nav_html(run_id: &str, nav: &NavState) -> String {
    let control = |label: &str, target: Option<PageIndex>| match target {
        Some(page) => format!(
            "<a class=\"nav-link\" href=\"{}\">{}</a>",
            escape_html(&page_href(run_id, page)),
            label
        ),
        None => format!(
            "<span class=\"nav-link disabled\" aria-disabled=\"true\">{}</span>",
            label
        ),
    };

    format!(
        "<nav class=\"pagination\">{} <span class=\"page-label\">{}</span> {}</nav>\n",
        control("Previous", nav.prev_page()),
        escape_html(&nav.label),
        control("Next", nav.next_page()),
    )
}

fn row_html(row: &RowView) -> String {
    let role = match &row.name {
        Some(name) => format!("{} ({})", escape_html(&row.role), escape_html(name)),
        None => escape_html(&row.role),
    };
    format!(
        "<tr class=\"{}\"><td class=\"role\">{}</td><td class=\"content\">{}</td></tr>\n",
        row.shading.css_class(),
        role,
        escape_html(&row.content)
    )
}

pub fn table_html(table: &TableView) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<details class=\"event\" data-event-id=\"{}\"{}>\n",
        escape_html(&table.event_id),
        if table.expanded { " open" } else { "" }
    ));
    html.push_str(&format!("<summary>{}</summary>\n", escape_html(&table.caption)));
    html.push_str("<table>\n<thead><tr>");
    for heading in table.header {
        html.push_str(&format!("<th>{}</th>", heading));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        html.push_str(&row_html(row));
    }
    html.push_str("</tbody>\n</table>\n</details>\n");
    html
}

pub fn section_html(section: &SectionView) -> String {
    let mut html = format!(
        "<section class=\"panel\">\n<h2>{}</h2>\n",
        section.panel.title()
    );
    match &section.body {
        SectionBody::Fields(fields) => {
            html.push_str("<ul class=\"fields\">\n");
            for field in fields {
                html.push_str(&format!(
                    "<li><span class=\"key\">{}:</span> {}</li>\n",
                    escape_html(&field.key),
                    escape_html(&field.value)
                ));
            }
            html.push_str("</ul>\n");
        }
        SectionBody::Message(message) => {
            html.push_str(&format!("<p class=\"empty\">{}</p>\n", escape_html(message)));
        }
    }
    html.push_str("</section>\n");
    html
}

fn sample_body(view: &SamplePageView) -> String {
    let mut html = String::new();
    html.push_str(&nav_html(&view.run_id, &view.nav));
    if let Some(sample_id) = &view.sample_id {
        html.push_str(&format!(
            "<p class=\"sample-id\">Sample ID: {}</p>\n",
            escape_html(sample_id)
        ));
    }
    for table in &view.tables {
        html.push_str(&table_html(table));
    }
    html.push_str(&section_html(&view.metrics));
    html
}

fn panel_html<T>(title: &str, state: &PanelState<T>, body: impl FnOnce(&T) -> String) -> String {
    match state {
        PanelState::Loaded(view) => body(view),
        PanelState::NotFound(message) => format!(
            "<section class=\"panel\">\n<h2>{}</h2>\n<p class=\"not-found\">{}</p>\n</section>\n",
            title,
            escape_html(message)
        ),
        // A failed fetch stays visually identical to one still in flight.
        PanelState::Loading | PanelState::TransportError => format!(
            "<section class=\"panel\">\n<h2>{}</h2>\n<p class=\"loading\">Loading…</p>\n</section>\n",
            title
        ),
    }
}

impl Render for RunView {
    fn to_text(&self) -> String {
        super::text::run_view(self)
    }

    fn to_html(&self) -> String {
        let mut body = format!("<h1>{}</h1>\n", escape_html(&self.title));
        body.push_str(&panel_html("Sample", &self.sample, |view| {
            format!(
                "<section class=\"panel sample\">\n<h2>Sample</h2>\n{}</section>\n",
                sample_body(view)
            )
        }));
        body.push_str(&panel_html("Final Report", &self.final_report, section_html));
        body.push_str(&panel_html("Spec", &self.spec, section_html));
        document(&self.title, &body)
    }
}

impl Render for SamplePageView {
    fn to_text(&self) -> String {
        super::text::sample_page(self)
    }

    fn to_html(&self) -> String {
        let title = format!("Run {}", self.run_id);
        let body = format!("<h1>{}</h1>\n{}", escape_html(&title), sample_body(self));
        document(&title, &body)
    }
}

impl Render for SectionView {
    fn to_text(&self) -> String {
        super::text::section(self)
    }

    fn to_html(&self) -> String {
        document(self.panel.title(), &section_html(self))
    }
}

impl Render for RunIndexView {
    fn to_text(&self) -> String {
        super::text::run_index(self)
    }

    fn to_html(&self) -> String {
        let mut body = String::from("<h1>Runs</h1>\n");
        if self.is_empty() {
            body.push_str("<p class=\"empty\">No runs found!</p>\n");
            return document("Runs", &body);
        }
        body.push_str("<table class=\"runs\">\n<thead><tr><th>Run ID</th><th>Name</th><th>Eval</th><th>Solvers</th><th>Samples</th><th>Uploaded at</th></tr></thead>\n<tbody>\n");
        for (index, run) in self.runs.iter().enumerate() {
            let class = if index % 2 == 0 { "row-shaded" } else { "row-plain" };
            body.push_str(&format!(
                "<tr class=\"{}\"><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                class,
                escape_html(&page_href(&run.run_id, PageIndex::FIRST)),
                escape_html(&run.run_id),
                escape_html(&run.name),
                escape_html(&run.eval),
                escape_html(&run.solvers),
                run.samples,
                escape_html(&run.uploaded_at),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
        document("Runs", &body)
    }
}
