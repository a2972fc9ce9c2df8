//! Coerción de valores crudos (JSON o texto de CLI) a números tipados.

use std::collections::BTreeMap;

use serde_json::Value;

use super::ParamType;
use crate::errors::CoreError;

/// Argumentos sin validar, indexados por nombre de parámetro.
pub type RawArguments = BTreeMap<String, Value>;

/// Convierte `value` al tipo declarado `ty`.
///
/// Acepta números JSON y strings numéricos (los valores llegan como texto
/// desde la CLI y desde el contenedor de un step). Cualquier otro tipo JSON
/// es un `TypeMismatch`.
pub fn coerce_value(name: &str, ty: ParamType, value: &Value) -> Result<f64, CoreError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(v) if ty.accepts(v) => Ok(v),
        _ => Err(CoreError::TypeMismatch { name: name.to_string(),
                                           expected: ty,
                                           found: describe(value) }),
    }
}

/// Representación textual de un valor ya validado, tal como viaja en los
/// manifests y en las peticiones de ejecución.
pub fn render_value(ty: ParamType, value: f64) -> String {
    match ty {
        ParamType::Integer if value == 0.0 => "0".to_string(),
        ParamType::Integer => format!("{value:.0}"),
        ParamType::Float => value.to_string(),
    }
}

/// Valor JSON de un número. JSON no representa `inf`, que se conserva como
/// texto (`"inf"`) para que `coerce_value` lo recupere.
pub fn number_value(value: f64) -> Value {
    serde_json::Number::from_f64(value).map(Value::Number)
                                       .unwrap_or_else(|| Value::String(value.to_string()))
}

/// Parsea pares `nombre=valor`. Los valores se conservan como texto; la
/// validación de tipo ocurre al enlazarlos contra una declaración.
pub fn parse_assignments<I, S>(items: I) -> Result<RawArguments, CoreError>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    let mut out = RawArguments::new();
    for item in items {
        let item = item.as_ref().trim();
        if item.is_empty() {
            continue;
        }
        let (name, value) = item.split_once('=')
                                .ok_or_else(|| CoreError::MalformedArgument(item.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::MalformedArgument(item.to_string()));
        }
        out.insert(name.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(out)
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        assert_eq!(coerce_value("a", ParamType::Float, &json!(3)), Ok(3.0));
        assert_eq!(coerce_value("a", ParamType::Float, &json!("2.5")), Ok(2.5));
        assert_eq!(coerce_value("a", ParamType::Integer, &json!(" 4 ")), Ok(4.0));
    }

    #[test]
    fn rejects_non_numeric() {
        let err = coerce_value("a", ParamType::Float, &json!("abc")).unwrap_err();
        assert!(matches!(err, CoreError::TypeMismatch { ref name, .. } if name == "a"));
        assert!(coerce_value("a", ParamType::Float, &json!(true)).is_err());
        assert!(coerce_value("a", ParamType::Integer, &json!(1.5)).is_err());
    }

    #[test]
    fn renders_without_trailing_zero() {
        assert_eq!(render_value(ParamType::Float, 3.0), "3");
        assert_eq!(render_value(ParamType::Float, 0.5), "0.5");
        assert_eq!(render_value(ParamType::Integer, 7.0), "7");
        assert_eq!(render_value(ParamType::Integer, -0.0), "0");
        assert_eq!(render_value(ParamType::Float, f64::INFINITY), "inf");
    }

    #[test]
    fn renders_large_integers_without_clamping() {
        assert_eq!(render_value(ParamType::Integer, 1e20), "100000000000000000000");
        assert_eq!(render_value(ParamType::Integer, -3e19), "-30000000000000000000");
    }

    #[test]
    fn infinite_values_survive_a_json_round_trip() {
        let v = number_value(f64::INFINITY);
        assert_eq!(v, json!("inf"));
        assert_eq!(coerce_value("a", ParamType::Float, &v), Ok(f64::INFINITY));
        assert_eq!(number_value(2.5), json!(2.5));
        assert!(coerce_value("a", ParamType::Float, &json!("NaN")).is_err());
    }

    #[test]
    fn parses_assignments() {
        let args = parse_assignments(["a=3", " b = 4 ", ""]).expect("parse");
        assert_eq!(args.get("a"), Some(&json!("3")));
        assert_eq!(args.get("b"), Some(&json!("4")));
        assert!(parse_assignments(["a"]).is_err());
        assert!(parse_assignments(["=3"]).is_err());
    }
}
