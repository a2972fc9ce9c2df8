//! Operaciones locales de la CLI: no requieren servicio de orquestación.

use std::fs;
use std::path::Path;

use log::info;
use pipeflow_core::param::render_value;
use pipeflow_core::{bind_arguments, compile, execute_step, parse_assignments, run_local, CoreError, LocalRun, RawArguments,
                    StepOutputs};
use pipeflow_steps::{addition_pipeline, StepRegistry};
use serde_json::Value;

use crate::errors::AppError;

/// Manifest de la "Addition pipeline" con la imagen `step_image`.
pub fn compile_manifest(step_image: &str) -> Result<Value, AppError> {
    let pipeline = addition_pipeline(step_image)?;
    Ok(compile(&pipeline))
}

/// Ejecuta la pipeline en proceso con los defaults fusionados con
/// `overrides`.
pub fn run_local_addition(step_image: &str, overrides: &RawArguments) -> Result<LocalRun, AppError> {
    let pipeline = addition_pipeline(step_image)?;
    let arguments = bind_arguments(&pipeline, overrides)?;
    Ok(run_local(&pipeline, &arguments))
}

/// Entrypoint del contenedor de un step: `pipeflow step <name> --arg k=v
/// --output <output>=<path>`.
///
/// Cada output pedido se escribe como texto en su ruta, creando los
/// directorios intermedios.
pub fn run_step(registry: &StepRegistry, name: &str, args: &[String], outputs: &[String]) -> Result<StepOutputs, AppError> {
    let step = registry.get(name)?;
    let raw = parse_assignments(args)?;
    let produced = execute_step(step.as_ref(), &raw)?;

    for target in outputs {
        let (output, path) = target.split_once('=')
                                   .ok_or_else(|| CoreError::MalformedArgument(target.clone()))?;
        let spec = step.outputs()
                       .iter()
                       .find(|o| o.name == output)
                       .ok_or_else(|| CoreError::UnknownParameter(output.to_string()))?;
        let value = produced.get(output)
                            .ok_or_else(|| CoreError::StepFailed { step: name.to_string(),
                                                                   reason: format!("output '{output}' not produced") })?;
        write_output(Path::new(path), &render_value(spec.ty, value))?;
        info!("step '{}' wrote output '{}' to {}", name, output, path);
    }
    Ok(produced)
}

fn write_output(path: &Path, contents: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn compiled_manifest_uses_requested_image() {
        let manifest = compile_manifest("registry/pipeflow:2").expect("manifest");
        assert!(manifest.to_string().contains("registry/pipeflow:2"));
    }

    #[test]
    fn local_run_with_overrides() {
        let overrides = parse_assignments(["a=3", "b=4"]).expect("args");
        let run = run_local_addition("pipeflow:test", &overrides).expect("run");
        assert!(run.succeeded());
        assert_eq!(run.output("add-op", "Output"), Some(7.0));
    }

    #[test]
    fn step_entrypoint_writes_outputs() {
        let dir = env::temp_dir().join(format!("pipeflow-step-{}", std::process::id()));
        let path = dir.join("Output").join("data");
        let outputs = run_step(&StepRegistry::builtin(),
                               "add-op",
                               &["a=3".to_string(), "b=4.5".to_string()],
                               &[format!("Output={}", path.display())]).expect("step");

        assert_eq!(outputs.get("Output"), Some(7.5));
        assert_eq!(fs::read_to_string(&path).expect("output file"), "7.5");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn step_entrypoint_rejects_unknown_steps_and_outputs() {
        let registry = StepRegistry::builtin();
        let err = run_step(&registry, "mul-op", &[], &[]).unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::UnknownStep(_))));

        let err = run_step(&registry, "add-op", &["a=1".into(), "b=2".into()], &["Sum=/tmp/x".into()]).unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::UnknownParameter(_))));
    }
}
