//! Constantes compartidas por el compilador de manifests y los steps.
//!
//! `SDK_VERSION` forma parte del input del `definition_hash`: cambiarla
//! produce una nueva versión de todas las pipelines aunque su definición no
//! cambie.

/// Versión lógica del SDK que genera los manifests.
pub const SDK_VERSION: &str = "pipeflow-0.1";

/// Imagen por defecto en la que se empaqueta cada step.
pub const DEFAULT_STEP_IMAGE: &str = "pipeflow:latest";

/// Binario que actúa como entrypoint del contenedor de un step.
pub const STEP_ENTRYPOINT: &str = "pipeflow";

/// Nombre del output único de un step numérico.
pub const DEFAULT_OUTPUT: &str = "Output";

/// Directorio donde el contenedor deja los valores de salida.
pub const OUTPUTS_DIR: &str = "/tmp/outputs";

pub const SERVICE_ACCOUNT: &str = "pipeline-runner";

pub const PIPELINE_SPEC_ANNOTATION: &str = "pipelines.kubeflow.org/pipeline_spec";
pub const COMPONENT_SPEC_ANNOTATION: &str = "pipelines.kubeflow.org/component_spec";
pub const SDK_VERSION_ANNOTATION: &str = "pipeflow.io/sdk-version";
pub const DEFINITION_HASH_LABEL: &str = "pipeflow.io/definition-hash";
