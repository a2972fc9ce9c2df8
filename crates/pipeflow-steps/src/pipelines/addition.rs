//! "Addition pipeline": una única invocación de `add-op` parametrizada por
//! `a` (default 1) y `b` (default 7).

use pipeflow_core::{CoreError, ParamType, PipelineBuilder, PipelineDefinition, TaskArgument};

use crate::steps::add::add_op;

pub const ADDITION_PIPELINE_NAME: &str = "Addition pipeline";
pub const ADDITION_PIPELINE_DESCRIPTION: &str = "An example pipeline that adds two numbers.";

/// Construye la pipeline; `step_image` es la imagen en la que se empaqueta
/// `add-op`.
pub fn addition_pipeline(step_image: &str) -> Result<PipelineDefinition, CoreError> {
    PipelineBuilder::new(ADDITION_PIPELINE_NAME).description(ADDITION_PIPELINE_DESCRIPTION)
                                                .param("a", ParamType::Float, 1.0)
                                                .param("b", ParamType::Float, 7.0)
                                                .task(add_op().with_image(step_image),
                                                      [("a", TaskArgument::param("a")), ("b", TaskArgument::param("b"))])
                                                .build()
}
