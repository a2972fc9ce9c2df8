//! Runner local determinista.
//!
//! Ejecuta las tareas en orden de declaración dentro del proceso actual, sin
//! contenedores. Sirve para previsualizar el resultado de una ejecución y
//! para probar pipelines sin servicio de orquestación. Stop-on-failure: tras
//! la primera tarea fallida las restantes quedan en `Pending`.

use log::{debug, info, warn};

use crate::errors::CoreError;
use crate::param::{number_value, RawArguments};
use crate::pipeline::{BoundArguments, PipelineDefinition, TaskArgument};
use crate::step::{execute_step, StepOutputs, StepStatus};

/// Estado de una tarea tras la ejecución local.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub task_name: String,
    pub step_name: String,
    pub status: StepStatus,
    pub outputs: StepOutputs,
    pub error: Option<CoreError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalRun {
    pub pipeline_name: String,
    pub arguments: BoundArguments,
    pub tasks: Vec<TaskRecord>,
}

impl LocalRun {
    pub fn succeeded(&self) -> bool {
        self.tasks.iter().all(|t| t.status == StepStatus::FinishedOk)
    }

    pub fn task(&self, name: &str) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.task_name == name)
    }

    /// Output `output` de la tarea `task`, si terminó correctamente.
    pub fn output(&self, task: &str, output: &str) -> Option<f64> {
        self.task(task).and_then(|t| t.outputs.get(output))
    }

    /// Tareas que no llegaron a ejecutarse por un fallo previo.
    pub fn skipped(&self) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter().filter(|t| !t.status.is_terminal())
    }

    pub fn first_error(&self) -> Option<&CoreError> {
        self.tasks.iter().find_map(|t| t.error.as_ref())
    }
}

pub fn run_local(pipeline: &PipelineDefinition, arguments: &BoundArguments) -> LocalRun {
    let mut records: Vec<TaskRecord> = pipeline.tasks()
                                               .iter()
                                               .map(|t| TaskRecord { task_name: t.name.clone(),
                                                                     step_name: t.step.name().to_string(),
                                                                     status: StepStatus::Pending,
                                                                     outputs: StepOutputs::new(),
                                                                     error: None })
                                               .collect();

    info!("running pipeline '{}' locally ({} tasks)", pipeline.name(), records.len());
    for (task, record) in pipeline.tasks().iter().zip(records.iter_mut()) {
        record.status = StepStatus::Running;

        let mut raw = RawArguments::new();
        for (input, arg) in &task.arguments {
            let value = match arg {
                TaskArgument::Param(p) => arguments.get(p),
                TaskArgument::Constant(c) => Some(*c),
            };
            if let Some(v) = value {
                raw.insert(input.clone(), number_value(v));
            }
        }

        match execute_step(task.step.as_ref(), &raw) {
            Ok(outputs) => {
                debug!("task '{}' finished with {:?}", task.name, outputs);
                record.status = StepStatus::FinishedOk;
                record.outputs = outputs;
            }
            Err(error) => {
                warn!("task '{}' failed: {}", task.name, error);
                record.status = StepStatus::Failed;
                record.error = Some(error);
                break;
            }
        }
    }

    LocalRun { pipeline_name: pipeline.name().to_string(),
               arguments: arguments.clone(),
               tasks: records }
}
