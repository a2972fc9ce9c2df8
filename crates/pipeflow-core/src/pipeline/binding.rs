//! Enlace de argumentos de ejecución contra los parámetros de una pipeline.

use serde_json::Value;

use super::PipelineDefinition;
use crate::errors::CoreError;
use crate::param::{coerce_value, merge_json, number_value, render_value, ParamType, RawArguments};

#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    pub name: String,
    pub ty: ParamType,
    pub value: f64,
}

impl BoundArgument {
    /// Valor como texto, tal como viaja en la petición de ejecución.
    pub fn rendered(&self) -> String {
        render_value(self.ty, self.value)
    }
}

/// Argumentos validados, en el orden de declaración de la pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments(Vec<BoundArgument>);

impl BoundArguments {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|a| a.name == name).map(|a| a.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundArgument> {
        self.0.iter()
    }

    /// Pares `(nombre, valor renderizado)`.
    pub fn rendered(&self) -> Vec<(String, String)> {
        self.0.iter().map(|a| (a.name.clone(), a.rendered())).collect()
    }

    /// Objeto JSON `{nombre: número}`.
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.iter().map(|a| (a.name.clone(), number_value(a.value))).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fusiona los defaults de `pipeline` con `overrides` (los overrides ganan)
/// y valida el resultado.
///
/// Errores: `UnknownParameter` si un override no corresponde a ningún
/// parámetro declarado, `TypeMismatch` si un valor no es numérico o no
/// respeta su tipo, `MissingArgument` si un parámetro sin default queda sin
/// valor.
pub fn bind_arguments(pipeline: &PipelineDefinition, overrides: &RawArguments) -> Result<BoundArguments, CoreError> {
    if let Some(unknown) = overrides.keys().find(|k| pipeline.param(k).is_none()) {
        return Err(CoreError::UnknownParameter(unknown.clone()));
    }

    let overrides_json = Value::Object(overrides.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
    let merged = merge_json(&pipeline.defaults(), &overrides_json);

    let mut bound = Vec::with_capacity(pipeline.params().len());
    for spec in pipeline.params() {
        let raw = merged.get(&spec.name)
                        .ok_or_else(|| CoreError::MissingArgument(spec.name.clone()))?;
        let value = coerce_value(&spec.name, spec.ty, raw)?;
        bound.push(BoundArgument { name: spec.name.clone(),
                                   ty: spec.ty,
                                   value });
    }
    Ok(BoundArguments(bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineBuilder, TaskArgument};
    use crate::step::{StepDescriptor, StepInputs, StepOutputs};
    use serde_json::json;

    fn sum(inputs: &StepInputs) -> Result<StepOutputs, CoreError> {
        Ok(StepOutputs::single("Output", inputs.get("a")? + inputs.get("b")?))
    }

    fn pipeline() -> PipelineDefinition {
        let step = StepDescriptor::new("sum", sum).with_input("a", ParamType::Float)
                                                  .with_input("b", ParamType::Float)
                                                  .with_output("Output", ParamType::Float);
        PipelineBuilder::new("p").param("a", ParamType::Float, 1.0)
                                 .required_param("b", ParamType::Integer)
                                 .task(step, [("a", TaskArgument::param("a")), ("b", TaskArgument::param("b"))])
                                 .build()
                                 .expect("valid pipeline")
    }

    #[test]
    fn overrides_win_over_defaults() {
        let mut raw = RawArguments::new();
        raw.insert("b".into(), json!(4));
        let bound = bind_arguments(&pipeline(), &raw).expect("bind");
        assert_eq!(bound.get("a"), Some(1.0));
        assert_eq!(bound.get("b"), Some(4.0));
        assert_eq!(bound.rendered(), vec![("a".to_string(), "1".to_string()), ("b".to_string(), "4".to_string())]);

        raw.insert("a".into(), json!("2.5"));
        let bound = bind_arguments(&pipeline(), &raw).expect("bind");
        assert_eq!(bound.to_json(), json!({"a": 2.5, "b": 4.0}));
    }

    #[test]
    fn rejects_unknown_missing_and_mistyped() {
        let mut raw = RawArguments::new();
        raw.insert("c".into(), json!(1));
        assert_eq!(bind_arguments(&pipeline(), &raw), Err(CoreError::UnknownParameter("c".into())));

        assert_eq!(bind_arguments(&pipeline(), &RawArguments::new()),
                   Err(CoreError::MissingArgument("b".into())));

        let mut raw = RawArguments::new();
        raw.insert("b".into(), json!(4.5));
        assert!(matches!(bind_arguments(&pipeline(), &raw), Err(CoreError::TypeMismatch { .. })));
    }
}
