//! Compilación de una `PipelineDefinition` al manifest que se envía al
//! servicio de orquestación.
//!
//! El manifest tiene la forma de un Argo `Workflow`: un template DAG de
//! entrada (nombre de la pipeline saneado) con una tarea por invocación y un
//! template de contenedor por step distinto. Los parámetros de la pipeline
//! se declaran en `spec.arguments` con sus defaults renderizados.

use std::collections::BTreeSet;

use serde_json::{json, Value};

use super::{PipelineDefinition, TaskArgument, TaskInvocation};
use crate::constants::{COMPONENT_SPEC_ANNOTATION, DEFINITION_HASH_LABEL, OUTPUTS_DIR, PIPELINE_SPEC_ANNOTATION,
                       SDK_VERSION, SDK_VERSION_ANNOTATION, SERVICE_ACCOUNT};
use crate::param::render_value;
use crate::step::StepDefinition;

/// Nombre compatible con Kubernetes: minúsculas, `[a-z0-9-]`, sin guiones
/// en los extremos.
pub fn sanitize_k8s_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Ruta del fichero en el que el contenedor escribe el output `output`.
pub fn output_path(output: &str) -> String {
    format!("{OUTPUTS_DIR}/{output}/data")
}

pub fn compile(pipeline: &PipelineDefinition) -> Value {
    let mut entrypoint = sanitize_k8s_name(pipeline.name());
    let step_templates: BTreeSet<String> = pipeline.tasks().iter().map(|t| template_name(t.step.as_ref())).collect();
    if step_templates.contains(&entrypoint) {
        entrypoint = format!("{entrypoint}-pipeline");
    }

    let mut templates: Vec<Value> = Vec::new();
    let mut emitted = BTreeSet::new();
    for task in pipeline.tasks() {
        let name = template_name(task.step.as_ref());
        if emitted.insert(name.clone()) {
            templates.push(container_template(&name, task.step.as_ref()));
        }
    }
    templates.push(dag_template(&entrypoint, pipeline));

    let arguments: Vec<Value> = pipeline.params()
                                        .iter()
                                        .map(|p| match p.default {
                                            Some(d) => json!({ "name": p.name, "value": render_value(p.ty, d) }),
                                            None => json!({ "name": p.name }),
                                        })
                                        .collect();

    let pipeline_spec = json!({
        "name": pipeline.name(),
        "description": pipeline.description(),
        "inputs": pipeline.params(),
    });

    json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "Workflow",
        "metadata": {
            "generateName": format!("{entrypoint}-"),
            "annotations": {
                PIPELINE_SPEC_ANNOTATION: pipeline_spec.to_string(),
                SDK_VERSION_ANNOTATION: SDK_VERSION,
            },
            // Los valores de label están limitados a 63 caracteres.
            "labels": { DEFINITION_HASH_LABEL: &pipeline.definition_hash()[..32] },
        },
        "spec": {
            "entrypoint": entrypoint,
            "templates": templates,
            "arguments": { "parameters": arguments },
            "serviceAccountName": SERVICE_ACCOUNT,
        },
    })
}

fn template_name(step: &dyn StepDefinition) -> String {
    sanitize_k8s_name(step.name())
}

fn container_template(name: &str, step: &dyn StepDefinition) -> Value {
    let mut args: Vec<String> = Vec::new();
    for input in step.inputs() {
        args.push("--arg".to_string());
        args.push(format!("{0}={{{{inputs.parameters.{0}}}}}", input.name));
    }
    for output in step.outputs() {
        args.push("--output".to_string());
        args.push(format!("{}={}", output.name, output_path(&output.name)));
    }

    let inputs: Vec<Value> = step.inputs().iter().map(|i| json!({ "name": i.name })).collect();
    let outputs: Vec<Value> = step.outputs()
                                  .iter()
                                  .map(|o| {
                                      json!({
                                          "name": format!("{name}-{}", o.name),
                                          "valueFrom": { "path": output_path(&o.name) },
                                      })
                                  })
                                  .collect();
    let component_spec = json!({
        "name": step.name(),
        "description": step.description(),
        "inputs": step.inputs(),
        "outputs": step.outputs(),
    });

    json!({
        "name": name,
        "container": {
            "image": step.image(),
            "command": step.command(),
            "args": args,
        },
        "inputs": { "parameters": inputs },
        "outputs": { "parameters": outputs },
        "metadata": {
            "annotations": { COMPONENT_SPEC_ANNOTATION: component_spec.to_string() },
        },
    })
}

fn dag_template(entrypoint: &str, pipeline: &PipelineDefinition) -> Value {
    let inputs: Vec<Value> = pipeline.params().iter().map(|p| json!({ "name": p.name })).collect();
    let tasks: Vec<Value> = pipeline.tasks().iter().map(dag_task).collect();
    json!({
        "name": entrypoint,
        "inputs": { "parameters": inputs },
        "dag": { "tasks": tasks },
    })
}

fn dag_task(task: &TaskInvocation) -> Value {
    let mut parameters: Vec<Value> = Vec::new();
    for input in task.step.inputs() {
        let value = match task.arguments.get(&input.name) {
            Some(TaskArgument::Param(p)) => format!("{{{{inputs.parameters.{p}}}}}"),
            Some(TaskArgument::Constant(c)) => render_value(input.ty, *c),
            // Inputs sin binding usan el default del step.
            None => match input.default {
                Some(d) => render_value(input.ty, d),
                None => continue,
            },
        };
        parameters.push(json!({ "name": input.name, "value": value }));
    }
    json!({
        "name": sanitize_k8s_name(&task.name),
        "template": template_name(task.step.as_ref()),
        "arguments": { "parameters": parameters },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_k8s_name("Addition pipeline"), "addition-pipeline");
        assert_eq!(sanitize_k8s_name("add_op"), "add-op");
        assert_eq!(sanitize_k8s_name("  My  Step!! "), "my-step");
    }

    #[test]
    fn output_paths_live_under_outputs_dir() {
        assert_eq!(output_path("Output"), "/tmp/outputs/Output/data");
    }
}
