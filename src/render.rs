//! Purpose: Render a JSON value as indented text for the output file.
//! Exports: `to_pretty_string`.
//! Role: Small, pure formatter used by the dump pipeline.
//! Invariants: Output re-parses to a value equal to the input.
//! Invariants: Numbers keep the exact text they were decoded from.
//! Invariants: Output is pure ASCII; other code points become `\uXXXX` escapes.
//! Invariants: Empty containers render as `[]`/`{}`; no trailing newline.
use serde_json::{Map, Value};

pub fn to_pretty_string(value: &Value, indent: usize) -> String {
    let mut out = String::new();
    write_value(value, 0, indent, &mut out);
    out
}

fn write_value(value: &Value, depth: usize, indent: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(val) => out.push_str(if *val { "true" } else { "false" }),
        Value::Number(num) => out.push_str(&num.to_string()),
        Value::String(text) => write_string(text, out),
        Value::Array(items) => write_array(items, depth, indent, out),
        Value::Object(map) => write_object(map, depth, indent, out),
    }
}

fn write_array(items: &[Value], depth: usize, indent: usize, out: &mut String) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        push_newline_indent(depth + 1, indent, out);
        write_value(item, depth + 1, indent, out);
    }
    push_newline_indent(depth, indent, out);
    out.push(']');
}

fn write_object(map: &Map<String, Value>, depth: usize, indent: usize, out: &mut String) {
    if map.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    for (idx, (key, value)) in map.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        push_newline_indent(depth + 1, indent, out);
        write_string(key, out);
        out.push_str(": ");
        write_value(value, depth + 1, indent, out);
    }
    push_newline_indent(depth, indent, out);
    out.push('}');
}

fn write_string(text: &str, out: &mut String) {
    // serde_json handles quotes, backslashes and control characters.
    let encoded = serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string());
    if encoded.is_ascii() {
        out.push_str(&encoded);
        return;
    }
    let mut units = [0u16; 2];
    for ch in encoded.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
}

fn push_newline_indent(depth: usize, indent: usize, out: &mut String) {
    out.push('\n');
    for _ in 0..depth * indent {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::to_pretty_string;
    use serde_json::{Value, json};

    #[test]
    fn object_uses_four_space_indent() {
        let value = json!({"a": 1, "b": [true, null]});
        let text = to_pretty_string(&value, 4);
        assert_eq!(
            text,
            "{\n    \"a\": 1,\n    \"b\": [\n        true,\n        null\n    ]\n}"
        );
    }

    #[test]
    fn empty_containers_stay_inline() {
        let value = json!({"list": [], "map": {}});
        assert_eq!(
            to_pretty_string(&value, 4),
            "{\n    \"list\": [],\n    \"map\": {}\n}"
        );
    }

    #[test]
    fn scalars_render_bare() {
        assert_eq!(to_pretty_string(&json!(null), 4), "null");
        assert_eq!(to_pretty_string(&json!(42), 4), "42");
        assert_eq!(to_pretty_string(&json!("hi"), 4), "\"hi\"");
    }

    #[test]
    fn non_ascii_is_escaped() {
        let value = json!("Caol Ila \u{00e9} \u{1f943}");
        let text = to_pretty_string(&value, 4);
        assert!(text.is_ascii());
        assert_eq!(text, "\"Caol Ila \\u00e9 \\ud83e\\udd43\"");
        let decoded: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(decoded, value);
    }

    #[test]
    fn key_order_is_preserved() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).expect("json");
        let text = to_pretty_string(&value, 2);
        assert_eq!(text, "{\n  \"z\": 1,\n  \"a\": 2,\n  \"m\": 3\n}");
    }

    #[test]
    fn nested_values_round_trip() {
        let value = json!({
            "hits": {
                "total": {"value": 2},
                "hits": [
                    {"_id": "1", "_source": {"price": 120.5, "tags": ["peated", "islay"]}},
                    {"_id": "2", "_source": {"price": 0, "note": "line\nbreak \"quoted\""}}
                ]
            }
        });
        let text = to_pretty_string(&value, 4);
        let decoded: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(decoded, value);
    }
}
