//! HTML rendering for the single-page form

use crate::types::transaction::{TransactionRecord, FEATURE_NAMES};
use crate::types::verdict::EvaluationResult;
use crate::web::form::{display_value, sidebar_fields};
use std::collections::HashMap;
use std::fmt::Write;

/// What to show in the result area after "Analyze Transaction".
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Verdict(EvaluationResult),
    /// Already formatted for the user
    Error(String),
}

impl Outcome {
    fn banner_class(&self) -> &'static str {
        match self {
            Outcome::Verdict(result) if !result.is_fraud => "banner success",
            _ => "banner error",
        }
    }

    fn text(&self) -> String {
        match self {
            Outcome::Verdict(result) => result.message(),
            Outcome::Error(message) => message.clone(),
        }
    }
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; }
aside { width: 22rem; padding: 1rem; background: #f0f2f6; min-height: 100vh; }
main { flex: 1; padding: 2rem; }
label { display: block; font-size: 0.85rem; margin-top: 0.6rem; }
input { width: 100%; box-sizing: border-box; }
button { margin-top: 1rem; width: 100%; padding: 0.5rem; }
.banner { padding: 1rem; border-radius: 0.4rem; margin: 1rem 0; }
.success { background: #dff5e3; color: #176f2c; }
.error { background: #fde2e1; color: #a31d1d; }
table { border-collapse: collapse; font-size: 0.8rem; display: block; overflow-x: auto; }
th, td { border: 1px solid #ccc; padding: 0.25rem 0.5rem; text-align: right; }
"#;

/// Full page: sidebar form, verdict banner (if any) and the record dump.
///
/// `submitted` prefills the widgets; `record` is the row handed to the model.
/// Without a record, the submitted text is dumped as-is so a rejected input
/// stays visible next to the error.
pub fn render_page(
    submitted: Option<&HashMap<String, String>>,
    outcome: Option<&Outcome>,
    record: Option<&TransactionRecord>,
) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Fraud Detection System</title>\n");
    let _ = writeln!(html, "<style>{}</style>", STYLE);
    html.push_str("</head>\n<body>\n");

    render_sidebar(&mut html, submitted);

    html.push_str("<main>\n<h1>Fraud Detection System</h1>\n");
    html.push_str(
        "<p>This app analyzes credit card transactions and predicts whether they are \
         fraudulent or legitimate.</p>\n",
    );

    if let Some(outcome) = outcome {
        let _ = writeln!(
            html,
            "<div class=\"{}\" role=\"status\">{}</div>",
            outcome.banner_class(),
            escape(&outcome.text())
        );
    }

    match (record, submitted) {
        (Some(record), _) => {
            html.push_str("<h3>Input Data:</h3>\n");
            render_record_table(&mut html, record);
        }
        (None, Some(submitted)) => {
            html.push_str("<h3>Input Data:</h3>\n");
            render_submitted_table(&mut html, submitted);
        }
        (None, None) => {}
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, submitted: Option<&HashMap<String, String>>) {
    html.push_str("<aside>\n<h2>Transaction Details</h2>\n");
    html.push_str("<form method=\"post\" action=\"/analyze\">\n");

    for field in sidebar_fields() {
        let _ = write!(
            html,
            "<label for=\"{name}\">{label}</label>\
             <input type=\"number\" id=\"{name}\" name=\"{name}\" step=\"{step}\" value=\"{value}\"",
            name = field.name,
            label = escape(field.label),
            step = field.step,
            value = escape(&display_value(&field, submitted)),
        );
        if let Some(min) = field.min {
            let _ = write!(html, " min=\"{}\"", min);
        }
        if let Some(max) = field.max {
            let _ = write!(html, " max=\"{}\"", max);
        }
        html.push_str(" required>\n");
    }

    html.push_str("<button type=\"submit\">Analyze Transaction</button>\n</form>\n</aside>\n");
}

/// One-row table in training column order.
fn render_record_table(html: &mut String, record: &TransactionRecord) {
    render_table_head(html);
    for (_, value) in record.columns() {
        let _ = write!(html, "<td>{}</td>", value);
    }
    html.push_str("</tr></tbody>\n</table>\n");
}

fn render_table_head(html: &mut String) {
    html.push_str("<table>\n<thead><tr>");
    for name in FEATURE_NAMES {
        let _ = write!(html, "<th>{}</th>", name);
    }
    html.push_str("</tr></thead>\n<tbody><tr>");
}

/// Raw submitted text per column; blank where nothing was sent.
fn render_submitted_table(html: &mut String, submitted: &HashMap<String, String>) {
    render_table_head(html);
    for name in FEATURE_NAMES {
        let raw = submitted.get(name).map(String::as_str).unwrap_or("");
        let _ = write!(html, "<td>{}</td>", escape(raw));
    }
    html.push_str("</tr></tbody>\n</table>\n");
}

/// Minimal HTML text/attribute escaping
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
