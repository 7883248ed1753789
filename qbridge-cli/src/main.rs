//! QBridge CLI - Command-line interface
//!
//! Submits a quantum circuit through the gateway, polls status until the
//! job reaches a terminal state, and prints the result. Provider
//! credentials come from the environment (see `GatewayConfig::from_env`).

use clap::{Parser, ValueEnum};
use qbridge::gateway::QuantumGateway;
use qbridge::job::{CircuitFormat, JobRequest};
use qbridge::logging::init_logging;
use qbridge::status::JobStatus;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Debug, Clone, ValueEnum)]
enum ProviderArg {
    /// IBM Quantum
    Ibm,
    /// Google Quantum AI
    Google,
    /// Azure Quantum
    Azure,
}

impl ProviderArg {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Ibm => "ibm",
            Self::Google => "google",
            Self::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum FormatArg {
    /// Qiskit-style gate list
    Qiskit,
    /// Cirq moment structure
    Cirq,
    /// Q# program
    Qsharp,
}

impl From<FormatArg> for CircuitFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Qiskit => CircuitFormat::Qiskit,
            FormatArg::Cirq => CircuitFormat::Cirq,
            FormatArg::Qsharp => CircuitFormat::Qsharp,
        }
    }
}

#[derive(Parser)]
#[command(name = "qbridge")]
#[command(version = qbridge::VERSION)]
#[command(about = "Submit quantum circuits to cloud providers through one gateway", long_about = None)]
struct Args {
    /// Path to the circuit JSON file
    #[arg(long)]
    circuit: PathBuf,

    /// Algorithm type (maxcut, vqe, qaoa, quantum_ml, custom, ...)
    #[arg(long, default_value = "custom")]
    algorithm: String,

    /// Circuit interchange format
    #[arg(long, value_enum, default_value = "qiskit")]
    format: FormatArg,

    /// Pin a provider instead of letting the selection policy choose
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Number of shots
    #[arg(long, default_value = "1024")]
    shots: u64,

    /// Seconds between status polls
    #[arg(long, default_value = "5")]
    poll_interval: u64,

    /// Maximum number of status polls before giving up
    #[arg(long, default_value = "60")]
    max_polls: u32,

    /// Directory for the log file (stdout only when omitted)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn load_circuit(path: &PathBuf) -> Value {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: cannot read circuit file {}: {}", path.display(), e);
            process::exit(1);
        }
    };
    match serde_json::from_str(&raw) {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("Error: circuit file {} is not valid JSON: {}", path.display(), e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _logging_guard = match init_logging(args.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let circuit = load_circuit(&args.circuit);

    let mut request = JobRequest::new(args.algorithm.clone(), circuit)
        .with_circuit_format(args.format.clone().into())
        .with_execution_param("shots", json!(args.shots));
    if let Some(provider) = &args.provider {
        request = request.with_preferred_provider(provider.as_str());
    }

    let gateway = match QuantumGateway::from_env() {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Error: failed to initialize gateway: {}", e);
            process::exit(1);
        }
    };

    let job_id = match gateway.submit(request).await {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: job submission failed: {}", e);
            process::exit(1);
        }
    };

    let record = gateway.submission_record(&job_id);
    println!("Job submitted: {}", job_id);
    if let Some(record) = record {
        println!("Provider: {}", record.selected_provider);
    }

    let mut last_status = JobStatus::Pending;
    for poll in 0..args.max_polls {
        match gateway.job_status(&job_id).await {
            Ok(view) => {
                if view.status != last_status {
                    println!("Status: {} (external id {})", view.status, view.external_id);
                    last_status = view.status;
                }
                if view.status.is_terminal() {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Warning: status poll {} failed: {}", poll + 1, e);
            }
        }
        tokio::time::sleep(Duration::from_secs(args.poll_interval)).await;
    }

    match last_status {
        JobStatus::Completed => match gateway.job_result(&job_id).await {
            Ok(result) => {
                println!("Result:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).unwrap_or_else(|_| result.to_string())
                );
            }
            Err(e) => {
                eprintln!("Error: result retrieval failed: {}", e);
                process::exit(1);
            }
        },
        JobStatus::Failed | JobStatus::Cancelled => {
            eprintln!("Job finished without a result: {}", last_status);
            process::exit(1);
        }
        other => {
            eprintln!(
                "Job still '{}' after {} polls; retry later with the same gateway process",
                other, args.max_polls
            );
            process::exit(1);
        }
    }
}
