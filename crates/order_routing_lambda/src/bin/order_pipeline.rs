use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use order_routing_lambda::adapters::notifier::ConsoleNotifier;
use order_routing_lambda::config::{
    SimulationPaths, BASE_DIR_ENV, DISPATCH_MESSAGE_PATH_ENV, ORDER_EVENT_PATH_ENV,
    WAREHOUSE_TABLE_PATH_ENV,
};
use order_routing_lambda::simulation::{run_notify_stage, run_pipeline, run_route_stage};

#[derive(Parser)]
#[command(
    name = "order_pipeline",
    about = "Run the order routing stages against local JSON files",
    long_about = "Simulates the two-stage serverless order routing workflow.\n\
                  JSON files stand in for the incoming queue, the warehouse\n\
                  database, and the dispatch queue."
)]
struct Cli {
    #[command(flatten)]
    files: FileArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FileArgs {
    /// Directory holding the simulation files
    #[arg(long, global = true, env = BASE_DIR_ENV, default_value = "data")]
    base_dir: PathBuf,
    /// Incoming order queue event (overrides the base directory file)
    #[arg(long, global = true, env = ORDER_EVENT_PATH_ENV)]
    event: Option<PathBuf>,
    /// Warehouse table (overrides the base directory file)
    #[arg(long, global = true, env = WAREHOUSE_TABLE_PATH_ENV)]
    warehouses: Option<PathBuf>,
    /// Dispatch queue message (overrides the base directory file)
    #[arg(long, global = true, env = DISPATCH_MESSAGE_PATH_ENV)]
    dispatch: Option<PathBuf>,
}

impl FileArgs {
    fn into_paths(self) -> SimulationPaths {
        SimulationPaths::from_base_dir(self.base_dir).with_overrides(
            self.event,
            self.warehouses,
            self.dispatch,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Stage one: route the queued order and write the dispatch message
    Route,
    /// Stage two: notify the warehouse named in the dispatch message
    Notify,
    /// Run both stages in order
    Run,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = cli.files.into_paths();
    let notifier = ConsoleNotifier::stdout();

    let outcome = match cli.command {
        Commands::Route => run_route_stage(&paths).map(|_| ()).map_err(|e| e.to_string()),
        Commands::Notify => run_notify_stage(&paths, &notifier)
            .map(|_| ())
            .map_err(|e| e.to_string()),
        Commands::Run => run_pipeline(&paths, &notifier)
            .map(|_| ())
            .map_err(|e| e.to_string()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
