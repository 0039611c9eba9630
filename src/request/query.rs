//! Query-string encoding.
//!
//! Nested JSON values are flattened bracket-style (`filter[q]=x`,
//! `ids[0]=1`) and then form-urlencoded, so `page[offset]=10` is rendered
//! as `page%5Boffset%5D=10`.

use serde_json::Value;

/// Flatten `key = value` into query pairs, appending to `pairs`.
///
/// `null` values are skipped; booleans render as `1` / `0`.
pub(crate) fn flatten(key: &str, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key.to_string(), if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key.to_string(), n.to_string())),
        Value::String(s) => pairs.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten(&format!("{key}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (name, item) in map {
                flatten(&format!("{key}[{name}]"), item, pairs);
            }
        }
    }
}

/// Flatten request variables into query pairs.
///
/// Object members become top-level keys, array elements are keyed by their
/// index, a bare scalar is keyed `0`.
pub(crate) fn from_variables(variables: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match variables {
        Value::Object(map) => {
            for (name, value) in map {
                flatten(name, value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(&index.to_string(), value, &mut pairs);
            }
        }
        scalar => flatten("0", scalar, &mut pairs),
    }
    pairs
}

/// Form-urlencode already flattened pairs.
pub(crate) fn encode(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(key: &str, value: Value) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        flatten(key, &value, &mut pairs);
        pairs
    }

    #[test]
    fn object_members_keep_insertion_order() {
        let pairs = from_variables(&json!({"zeta": "z", "alpha": {"b": 1, "a": 2}}));
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha[b]", "alpha[a]"]);
    }

    #[test]
    fn scalar_pairs() {
        assert_eq!(flat("page[offset]", json!(10)), vec![("page[offset]".into(), "10".into())]);
        assert_eq!(flat("q", json!("x")), vec![("q".into(), "x".into())]);
        assert_eq!(flat("flag", json!(true)), vec![("flag".into(), "1".into())]);
        assert!(flat("gone", json!(null)).is_empty());
    }

    #[test]
    fn nested_object_uses_brackets() {
        let pairs = flat("filter", json!({"q": "rust", "tag": "general"}));
        assert_eq!(
            pairs,
            vec![
                ("filter[q]".to_string(), "rust".to_string()),
                ("filter[tag]".to_string(), "general".to_string()),
            ]
        );
    }

    #[test]
    fn arrays_are_indexed() {
        let pairs = flat("ids", json!([4, 5]));
        assert_eq!(
            pairs,
            vec![
                ("ids[0]".to_string(), "4".to_string()),
                ("ids[1]".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn encode_escapes_brackets_and_spaces() {
        let encoded = encode(&[
            ("page[offset]".to_string(), "10".to_string()),
            ("filter[q]".to_string(), "hello world".to_string()),
        ]);
        assert_eq!(encoded, "page%5Boffset%5D=10&filter%5Bq%5D=hello+world");
    }

    #[test]
    fn variables_from_list() {
        let pairs = from_variables(&json!(["a", "b"]));
        assert_eq!(
            pairs,
            vec![("0".to_string(), "a".to_string()), ("1".to_string(), "b".to_string())]
        );
    }
}
