//! Utilidades para fusionar parámetros JSON de forma determinista.
//!
//! Merge "shallow": las claves de `b` reemplazan a las de `a`. Se usa para
//! aplicar los overrides de una ejecución sobre los defaults de la pipeline.

use serde_json::Value;

/// Merge shallow: keys from `b` override keys from `a` when both are objects.
/// Cuando alguno de los dos valores no es objeto, `b` tiene precedencia.
pub fn merge_json(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(ma), Value::Object(mb)) => {
            let mut out = ma.clone();
            for (k, v) in mb.iter() {
                out.insert(k.clone(), v.clone());
            }
            Value::Object(out)
        }
        // Non-objects: override
        (_, other) => other.clone(),
    }
}
