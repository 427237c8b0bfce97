#![forbid(unsafe_code)]
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};

mod commands;

#[derive(Debug, Parser)]
/// RCPSP scheduler
struct App {
    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a graphviz notation of the precedences of a psp lib problem
    Graph {
        psp_problem_file: PathBuf,
        output: PathBuf,
    },
    /// Schedule a psp lib problem and print `file;makespan;milliseconds;code`
    Schedule(Schedule),
    /// Schedule every psp lib problem in a folder
    Benchmark(Benchmark),
}

#[derive(Args, Debug)]
pub struct Schedule {
    path: PathBuf,

    /// Time limit in seconds
    #[arg(short, long, default_value_t = 60)]
    time_limit: u64,
}

#[derive(Args, Debug)]
pub struct Benchmark {
    psp_problem_file_folder: PathBuf,
    output: PathBuf,

    /// Time limit per problem in seconds
    #[arg(short, long, default_value_t = 60)]
    time_limit: u64,
}

fn main() {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Graph {
            psp_problem_file,
            output,
        } => commands::graph(psp_problem_file, output),
        Commands::Schedule(schedule) => commands::schedule(schedule),
        Commands::Benchmark(benchmark) => commands::benchmark(benchmark),
    } {
        error!("An error occurred: {err:#}");
        std::process::exit(1);
    }
}
