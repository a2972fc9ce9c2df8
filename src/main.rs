//! CLI `pipeflow`.
//!
//! Sin subcomando envía la "Addition pipeline" con la configuración del
//! entorno, igual que `pipeflow submit`.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use pipeflow::commands::{compile_manifest, run_local_addition, run_step};
use pipeflow::config::{init_dotenv, parse_argument_list};
use pipeflow::{register, submit, AppError, SubmitConfig};
use pipeflow_core::parse_assignments;
use pipeflow_steps::StepRegistry;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pipeflow", author, version, about = "Define y envía la Addition pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solicita una run en el servicio de orquestación.
    Submit(ServiceArgs),
    /// Imprime (o escribe en un fichero) el manifest compilado.
    Compile {
        #[arg(long, env = "PIPEFLOW_STEP_IMAGE")]
        image: Option<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Registra la definición de la pipeline en el servicio.
    Register(ServiceArgs),
    /// Ejecuta la pipeline en proceso e imprime el resultado.
    RunLocal {
        /// Override `nombre=valor`; se puede repetir.
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,
    },
    /// Entrypoint del contenedor de un step.
    Step {
        name: String,
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,
        #[arg(long = "output", value_name = "OUTPUT=PATH")]
        outputs: Vec<String>,
    },
}

/// Flags que sobreescriben la configuración del entorno.
#[derive(Args, Debug, Default)]
struct ServiceArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    namespace: Option<String>,
    #[arg(long)]
    experiment: Option<String>,
    #[arg(long)]
    run_name: Option<String>,
    /// Lista `a=3,b=4`; reemplaza a `PIPEFLOW_ARGS`.
    #[arg(long)]
    args: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl ServiceArgs {
    fn into_config(self) -> Result<SubmitConfig, AppError> {
        let mut cfg = SubmitConfig::from_env()?;
        if let Some(host) = self.host {
            cfg.host = host;
        }
        if let Some(token) = self.token {
            cfg.api_token = Some(token);
        }
        if let Some(namespace) = self.namespace {
            cfg.namespace = Some(namespace);
        }
        if let Some(experiment) = self.experiment {
            cfg.experiment = experiment;
        }
        if let Some(run_name) = self.run_name {
            cfg.run_name = Some(run_name);
        }
        if let Some(args) = self.args {
            cfg.arguments = parse_argument_list(&args)?;
        }
        if let Some(image) = self.image {
            cfg.step_image = image;
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout = Some(Duration::from_secs(secs));
        }
        Ok(cfg)
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Submit(args) => {
            let handle = submit(&args.into_config()?).await?;
            println!("{}", handle.url);
        }
        Command::Register(args) => {
            let pipeline = register(&args.into_config()?).await?;
            println!("{}", pipeline.id.unwrap_or_default());
        }
        Command::Compile { image, output } => {
            let image = match image {
                Some(image) => image,
                None => SubmitConfig::from_env()?.step_image,
            };
            let manifest = serde_json::to_string_pretty(&compile_manifest(&image)?)?;
            match output {
                Some(path) => {
                    fs::write(&path, manifest)?;
                    info!("manifest written to {}", path.display());
                }
                None => println!("{manifest}"),
            }
        }
        Command::RunLocal { args } => {
            let cfg = SubmitConfig::from_env()?;
            let overrides = if args.is_empty() { cfg.arguments } else { parse_assignments(&args)? };
            let local = run_local_addition(&cfg.step_image, &overrides)?;
            for task in &local.tasks {
                for (output, value) in task.outputs.iter() {
                    println!("{}.{} = {}", task.task_name, output, value);
                }
            }
            for task in local.skipped() {
                warn!("task '{}' was not run", task.task_name);
            }
            if let Some(err) = local.first_error() {
                return Err(err.clone().into());
            }
        }
        Command::Step { name, args, outputs } => {
            run_step(&StepRegistry::builtin(), &name, &args, &outputs)?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_dotenv();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .with_writer(std::io::stderr)
                             .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Submit(ServiceArgs::default()));
    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
