use console::{measure_text_width, style, Style, Term};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use status_core::StatusRecord;

/// Box width when stdout is not a terminal.
pub const FALLBACK_WIDTH: usize = 78;

const UP_LABEL: &str = "[✅ Up] ";
const DOWN_LABEL: &str = "[🔴 Down]";

pub fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map(|(_rows, cols)| usize::from(cols).saturating_sub(2))
        .unwrap_or(FALLBACK_WIDTH)
}

fn frame() -> Style {
    Style::new().color256(68)
}

fn label(record: &StatusRecord) -> &'static str {
    if record.is_up() {
        UP_LABEL
    } else {
        DOWN_LABEL
    }
}

fn name_part(record: &StatusRecord) -> String {
    let name = if record.is_up() {
        style(&record.name).bold()
    } else {
        style(&record.name).red()
    };
    format!("{} ({})", name, record.host_or_url)
}

fn message_part(record: &StatusRecord) -> String {
    if record.message.is_empty() {
        String::new()
    } else {
        format!("- {}", record.message)
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(measure_text_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Console lines for records already sorted by type.
///
/// One record renders as a single line; more render one box per type.
pub fn render_text(records: &[StatusRecord], width: usize) -> Vec<String> {
    match records {
        [] => Vec::new(),
        [only] => vec![format!(
            "{} {} {} {}",
            name_part(only),
            label(only),
            only.status,
            message_part(only)
        )
        .trim_end()
        .to_string()],
        _ => records
            .chunk_by(|a, b| a.monitor_type == b.monitor_type)
            .flat_map(|group| render_group(group, width))
            .collect(),
    }
}

fn render_group(group: &[StatusRecord], width: usize) -> Vec<String> {
    let frame = frame();
    let rule = "─".repeat(width.saturating_sub(2));

    let label_w = measure_text_width(UP_LABEL).max(measure_text_width(DOWN_LABEL));
    let status_w = group
        .iter()
        .map(|r| measure_text_width(&r.status.to_string()))
        .max()
        .unwrap_or(0);
    let message_w = group
        .iter()
        .map(|r| measure_text_width(&message_part(r)))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(group.len() + 2);
    lines.push(frame.apply_to(format!("┌{}┐", rule)).to_string());
    for record in group {
        let name = name_part(record);
        let status = format!(
            "{} {} {}",
            pad(label(record), label_w),
            pad(&record.status.to_string(), status_w),
            pad(&message_part(record), message_w)
        );
        let fill = width.saturating_sub(measure_text_width(&name) + measure_text_width(&status) + 4);
        lines.push(format!(
            "{} {}{}{} {}",
            frame.apply_to("│"),
            name,
            " ".repeat(fill),
            status,
            frame.apply_to("│")
        ));
    }
    lines.push(frame.apply_to(format!("└{}┘", rule)).to_string());
    lines
}

/// Records as a JSON array indented by four spaces.
pub fn render_json(records: &[StatusRecord]) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
