use chrono::{Local, TimeZone};
use serde_json::Value;

use terminal_size::{terminal_size, Height, Width};

// Print an API result: a table when the value is a list of records (or a page of them),
// pretty JSON otherwise. `force_json` (BOOKPAL_OUTPUT=json / --json-output) skips tables.
pub fn print_value(val: &Value, force_json: bool) {
    if !force_json {
        if let Some(table) = render_table(val, get_terminal_width(), &Local) {
            println!("{}", table);
            return;
        }
    }
    match val {
        Value::Null => println!("ok"),
        Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string())),
    }
}

/// Render `val` as an ASCII table fitted to `termw` columns. Returns `None` for shapes
/// that are not tabular (scalars, single objects, empty lists).
pub fn render_table<Tz: TimeZone>(val: &Value, termw: usize, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let (records, total) = extract_records(val)?;
    if records.is_empty() { return None; }
    let (cols, rows) = tabulate(records, tz);
    crate::tprintln!("[cli.outputformatter] {} rows, terminal width={}", rows.len(), termw);

    let mut widths: Vec<usize> = cols.iter().map(|s| visible_len(s).min(termw)).collect();
    for r in &rows {
        for (i, cell) in r.iter().enumerate() {
            widths[i] = widths[i].max(visible_len(cell).min(termw));
        }
    }

    let sep = build_separator(&widths);
    let mut out: Vec<String> = Vec::with_capacity(rows.len() + 5);
    out.push(fit_line_to_width(&sep, termw));
    out.push(fit_line_to_width(&build_row(&cols, &widths, false), termw));
    out.push(fit_line_to_width(&sep, termw));
    for r in &rows {
        out.push(fit_line_to_width(&build_row(r, &widths, true), termw));
    }
    out.push(fit_line_to_width(&sep, termw));
    let mut summary = format!("rows: {}", rows.len());
    if let Some(t) = total {
        summary.push_str(&format!(", total: {}", t));
    }
    out.push(summary);
    Some(out.join("\n"))
}

// Lists render directly; `{total, records}` pages render their records.
fn extract_records(val: &Value) -> Option<(&Vec<Value>, Option<u64>)> {
    match val {
        Value::Array(arr) => Some((arr, None)),
        Value::Object(map) => match map.get("records") {
            Some(Value::Array(arr)) => Some((arr, map.get("total").and_then(|t| t.as_u64()))),
            _ => None,
        },
        _ => None,
    }
}

// Columns are the union of keys in first-seen order; non-object items become a single
// "value" column.
fn tabulate<Tz: TimeZone>(records: &[Value], tz: &Tz) -> (Vec<String>, Vec<Vec<String>>)
where
    Tz::Offset: std::fmt::Display,
{
    if !records.iter().all(|r| r.is_object()) {
        let rows = records.iter().map(|r| vec![to_cell_string(r)]).collect();
        return (vec!["value".to_string()], rows);
    }
    let mut cols: Vec<String> = Vec::new();
    for r in records {
        if let Value::Object(map) = r {
            for k in map.keys() {
                if !cols.contains(k) { cols.push(k.clone()); }
            }
        }
    }
    let rows = records
        .iter()
        .map(|r| {
            cols.iter()
                .map(|c| match r.get(c) {
                    Some(v) if is_timestamp_column(c) => v.as_i64().and_then(|ms| format_epoch_ms(ms, tz)).unwrap_or_else(|| to_cell_string(v)),
                    Some(v) => to_cell_string(v),
                    None => String::new(),
                })
                .collect()
        })
        .collect();
    (cols, rows)
}

fn is_timestamp_column(name: &str) -> bool {
    name.ends_with("Time") || name.ends_with("At") || name == "time"
}

/// Epoch milliseconds as `YYYY-MM-DD HH:MM:SS` in `tz`.
pub fn format_epoch_ms<Tz: TimeZone>(ms: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let dt = tz.timestamp_millis_opt(ms).single()?;
    Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn to_cell_string(v: &Value) -> String {
    match v {
        Value::Null => String::from("-"),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.replace('\n', " "),
        // keep objects/arrays compact
        other => other.to_string(),
    }
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize], align_numbers: bool) -> String {
    let mut s = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or_default();
        let text = truncate(cell, *w);
        let pad = " ".repeat(w.saturating_sub(visible_len(&text)));
        s.push(' ');
        if align_numbers && is_numeric_like(cell) {
            s.push_str(&pad);
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&pad);
        }
        s.push_str(" |");
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    s.chars().take(max - 1).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    let st = s.trim();
    st.chars().any(|c| c.is_ascii_digit()) && st.chars().all(|c| c.is_ascii_digit() || ".-+eE".contains(c))
}

// --- Terminal fitting ---

fn get_terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), Height(_h))) if w > 8 => (w - 4) as usize,
        _ => 100,
    }
}

fn fit_line_to_width(s: &str, maxw: usize) -> String {
    if visible_len(s) <= maxw { return s.to_string(); }
    elide_middle(s, maxw)
}

fn visible_len(s: &str) -> usize { s.chars().count() }

fn elide_middle(s: &str, maxw: usize) -> String {
    if maxw <= 3 { return "…".repeat(maxw.min(1)); }
    let budget = maxw - 3;
    let front_keep = budget / 2;
    let back_keep = budget - front_keep;
    let chars: Vec<char> = s.chars().collect();
    let front: String = chars[..front_keep].iter().collect();
    let back: String = chars[chars.len() - back_keep..].iter().collect();
    format!("{}...{}", front, back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn list_of_objects_renders_union_of_columns() {
        let v = json!([{"id": 1, "bookName": "线性代数"}, {"id": 2, "stock": 3}]);
        let t = render_table(&v, 200, &Utc).unwrap();
        let lines: Vec<&str> = t.lines().collect();
        assert!(lines[1].contains("id") && lines[1].contains("bookName") && lines[1].contains("stock"));
        assert!(lines[3].contains("线性代数"));
        assert_eq!(lines.last().copied(), Some("rows: 2"));
    }

    #[test]
    fn page_shape_reports_total() {
        let v = json!({"total": 41, "records": [{"id": 7}]});
        let t = render_table(&v, 200, &Utc).unwrap();
        assert!(t.ends_with("rows: 1, total: 41"));
    }

    #[test]
    fn timestamps_render_as_datetimes() {
        let v = json!([{"createTime": 1_700_000_000_000i64, "price": 12.5}]);
        let t = render_table(&v, 200, &Utc).unwrap();
        assert!(t.contains("2023-11-14 22:13:20"), "{}", t);
        assert!(t.contains("12.5"));
    }

    #[test]
    fn non_tabular_values_are_left_alone() {
        assert!(render_table(&json!({"goodRate": 98.5}), 200, &Utc).is_none());
        assert!(render_table(&json!([]), 200, &Utc).is_none());
        assert!(render_table(&json!(null), 200, &Utc).is_none());
        let scalars = render_table(&json!(["a", "b"]), 200, &Utc).unwrap();
        assert!(scalars.contains("value"));
    }

    #[test]
    fn long_lines_are_elided_to_terminal_width() {
        let v = json!([{"description": "x".repeat(300)}]);
        let t = render_table(&v, 40, &Utc).unwrap();
        assert!(t.lines().all(|l| visible_len(l) <= 40));
    }
}
