use serde_json::Value;

pub const REPLICATION_KEY_TOKEN: &str = "replication_key";
pub const CURSOR_VALUE_TOKEN: &str = "cursor_value";

/// Renders the two incremental placeholders of a SQL template.
///
/// Only `{replication_key}` and `{cursor_value}` are substituted; any other
/// `{...}` run, including the platform's own `{{param}}` templates, passes
/// through verbatim. Single quotes in the cursor value are doubled so the
/// value cannot escape its SQL string literal.
pub fn render_incremental_sql(sql: &str, replication_key: &str, cursor_value: &Value) -> String {
    let value = sql_literal(cursor_value);
    let mut out = String::with_capacity(sql.len() + value.len());
    let mut rest = sql;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        // platform-side parameter template, copy through untouched
        if tail.starts_with("{{") {
            out.push_str("{{");
            rest = &tail[2..];
            continue;
        }

        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            return out;
        };
        match &tail[1..close] {
            t if t == REPLICATION_KEY_TOKEN => out.push_str(replication_key),
            t if t == CURSOR_VALUE_TOKEN => out.push_str(&value),
            _ => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Cursor value as it appears inside the template's string literal. The
/// template supplies the surrounding quotes, so strings are escaped but not
/// quoted here.
fn sql_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\'', "''"),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_both_tokens() {
        let sql = "SELECT * FROM prices.day WHERE {replication_key} > '{cursor_value}'";
        let rendered = render_incremental_sql(sql, "ts", &json!("2024-01-01"));
        assert!(rendered.contains("WHERE ts > '2024-01-01'"));
        assert!(!rendered.contains("{replication_key}"));
        assert!(!rendered.contains("{cursor_value}"));
    }

    #[test]
    fn substitutes_repeated_tokens() {
        let sql = "{replication_key} >= '{cursor_value}' ORDER BY {replication_key}";
        let rendered = render_incremental_sql(sql, "date", &json!("2025-01-01"));
        assert_eq!(rendered, "date >= '2025-01-01' ORDER BY date");
    }

    #[test]
    fn escapes_single_quotes_in_cursor_value() {
        let sql = "WHERE ts > '{cursor_value}'";
        let rendered = render_incremental_sql(sql, "ts", &json!("o'clock"));
        assert_eq!(rendered, "WHERE ts > 'o''clock'");
    }

    #[test]
    fn numeric_cursor_renders_unquoted() {
        let sql = "WHERE {replication_key} > {cursor_value}";
        let rendered = render_incremental_sql(sql, "block", &json!(18000000));
        assert_eq!(rendered, "WHERE block > 18000000");
    }

    #[test]
    fn platform_templates_pass_through() {
        let sql = "WHERE symbol = '{{symbol}}' AND {replication_key} > '{cursor_value}'";
        let rendered = render_incremental_sql(sql, "ts", &json!("2024-01-01"));
        assert!(rendered.contains("'{{symbol}}'"));
        assert!(rendered.contains("ts > '2024-01-01'"));
    }

    #[test]
    fn unknown_placeholders_stay_verbatim() {
        let sql = "WHERE {other} > 1";
        assert_eq!(render_incremental_sql(sql, "ts", &json!("x")), sql);
    }

    #[test]
    fn unterminated_brace_is_left_alone() {
        let sql = "WHERE ts > '{cursor";
        assert_eq!(render_incremental_sql(sql, "ts", &json!("x")), sql);
    }
}
