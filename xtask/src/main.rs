use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the order routing workspace",
    long_about = "A unified CLI for running the local order routing simulation,\n\
                  benchmarks, CI checks, and Lambda packaging."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both routing stages against the sample JSON files
    Simulate {
        /// Directory holding the simulation files
        #[arg(long, env = "ORDER_ROUTING_BASE_DIR", default_value = "data")]
        base_dir: String,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, simulation, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build and package Rust Lambda artifacts for Terraform inputs
    ServerlessPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build profile used for binaries
        #[arg(value_enum, long, default_value_t = BuildProfile::Release)]
        profile: BuildProfile,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run the local simulation against the sample files
    Simulate,
    /// Run benchmarks
    Bench,
    /// Run check + simulate + bench
    All,
}

#[derive(Clone, Copy, ValueEnum)]
enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    fn as_cargo_flag(self) -> Option<&'static str> {
        match self {
            Self::Debug => None,
            Self::Release => Some("--release"),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

const LAMBDA_BINARIES: [&str; 2] = ["route_lambda", "notify_lambda"];

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

const LAMBDA_DIST_DIR: &str = "infra/aws_order_routing/dist";

/// A Lambda binary and the zip it is packaged into.
#[derive(Debug, PartialEq)]
struct LambdaArtifact {
    binary_path: PathBuf,
    zip_path: PathBuf,
}

fn lambda_artifacts(target: &str, profile: BuildProfile) -> Vec<LambdaArtifact> {
    let target_dir = Path::new("target").join(target).join(profile.dir_name());
    let dist_dir = Path::new(LAMBDA_DIST_DIR);

    LAMBDA_BINARIES
        .into_iter()
        .map(|bin_name| LambdaArtifact {
            binary_path: target_dir.join(bin_name),
            zip_path: dist_dir.join(format!("{bin_name}.zip")),
        })
        .collect()
}

fn package_serverless_lambdas(target: &str, profile: BuildProfile) {
    ensure_rust_target_installed(target);

    step("Build serverless lambda binaries");

    let mut cargo_args = vec![
        "build",
        "-p",
        "order_routing_lambda",
        "--target",
        target,
    ];
    for bin_name in LAMBDA_BINARIES {
        cargo_args.push("--bin");
        cargo_args.push(bin_name);
    }
    if let Some(flag) = profile.as_cargo_flag() {
        cargo_args.push(flag);
    }
    run_cargo(&cargo_args);

    step("Package Lambda zip artifacts");
    fs::create_dir_all(LAMBDA_DIST_DIR).expect("failed to create lambda dist directory");

    eprintln!("\nPackaged artifacts:");
    for artifact in lambda_artifacts(target, profile) {
        if !artifact.binary_path.exists() {
            panic!(
                "expected lambda binary at '{}'",
                artifact.binary_path.display()
            );
        }
        package_lambda_zip(&artifact.binary_path, &artifact.zip_path).unwrap_or_else(|error| {
            panic!("failed to package '{}': {error}", artifact.zip_path.display())
        });
        eprintln!("- {}", artifact.zip_path.display());
    }
}

fn ensure_rust_target_installed(target: &str) {
    let output = match Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => {
            eprintln!("warning: could not list installed rust targets; skipping target preflight");
            return;
        }
    };

    if !target_is_installed(&String::from_utf8_lossy(&output.stdout), target) {
        panic!("rust target `{target}` is not installed; run `rustup target add {target}`");
    }
}

fn target_is_installed(installed: &str, target: &str) -> bool {
    installed.lines().any(|line| line.trim() == target)
}

/// Writes the binary as the `bootstrap` entry of a custom-runtime Lambda zip.
fn package_lambda_zip(binary_path: &Path, zip_path: &Path) -> ZipResult<()> {
    let binary = fs::read(binary_path)?;
    let mut zip = ZipWriter::new(fs::File::create(zip_path)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", options)?;
    zip.write_all(&binary)?;
    zip.finish()?;
    Ok(())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test order_routing_core");
    run_cargo(&["test", "-p", "order_routing_core"]);

    step("Test order_routing_lambda");
    run_cargo(&["test", "-p", "order_routing_lambda"]);

    step("Test xtask");
    run_cargo(&["test", "-p", "xtask"]);
}

fn simulate(base_dir: &str) {
    let scratch_dir = Path::new("target/simulation");
    fs::create_dir_all(scratch_dir).expect("failed to create simulation scratch directory");
    let dispatch_path = scratch_dir.join("dispatch_queue.json");
    let dispatch_path = dispatch_path.to_string_lossy().into_owned();

    run_cargo(&[
        "run",
        "-p",
        "order_routing_lambda",
        "--bin",
        "order_pipeline",
        "--",
        "--base-dir",
        base_dir,
        "--dispatch",
        dispatch_path.as_str(),
        "run",
    ]);
}

fn ci_simulate() {
    step("Run local order routing simulation");
    simulate("data");
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "order_routing_core", "--bench", "nearest"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { base_dir } => simulate(&base_dir),
        Commands::Bench => ci_bench(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Simulate => ci_simulate(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_simulate();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::ServerlessPackage { target, profile } => {
            package_serverless_lambdas(&target, profile);
        }
    }
}
