//! Canonical JSON mínimo: claves de objetos ordenadas, sin espacios.
//!
//! Es la base del `definition_hash` de una pipeline, por lo que dos
//! definiciones equivalentes deben producir exactamente el mismo string.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(_) => value.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted() {
        let a = json!({"b": 1, "a": [true, null], "c": {"z": "x", "y": 2.5}});
        assert_eq!(to_canonical_json(&a), r#"{"a":[true,null],"b":1,"c":{"y":2.5,"z":"x"}}"#);
    }

    #[test]
    fn strings_are_escaped() {
        let v = json!({"k": "say \"hi\""});
        assert_eq!(to_canonical_json(&v), r#"{"k":"say \"hi\""}"#);
    }
}
