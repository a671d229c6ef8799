use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, error};

use listingforge_cli::{CommandOutput, FileArgs, RunArgs, commands};
use listingforge_observability::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "listingforge",
    version,
    about = "Generate validated product listings with a language model"
)]
struct Cli {
    /// Log output format on stderr (json or pretty).
    #[arg(long, global = true, default_value = "json")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a request, call the model and validate its reply.
    Run(RunArgs),
    /// Validate a request without calling the model.
    Validate(FileArgs),
    /// Print the prompts that would be sent for a request.
    Prompt(FileArgs),
}

fn main() -> ExitCode {
    let dotenv = listingforge_infra::load_dotenv();
    let cli = Cli::parse();
    listingforge_observability::init(cli.log_format);
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    let outcome = match &cli.command {
        Commands::Run(args) => commands::run(args),
        Commands::Validate(args) => commands::validate(args),
        Commands::Prompt(args) => commands::prompt(args),
    };

    match outcome {
        Ok(CommandOutput { stdout, success }) => {
            println!("{stdout}");
            if success { ExitCode::SUCCESS } else { ExitCode::from(1) }
        }
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
