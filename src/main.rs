use clap::Parser;
use passhash::cli::{logger, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        Commands::Hash(ref args) => passhash::cli::commands::hash::execute(&cli, args),
        Commands::Verify {
            ref record,
            scheme,
        } => passhash::cli::commands::verify::execute(&cli, record, scheme),
        Commands::Inspect {
            ref record,
            scheme,
            ref format,
        } => passhash::cli::commands::inspect::execute(&cli, record, scheme, format),
        Commands::Algorithms => passhash::cli::commands::algorithms::execute(),
        Commands::Version => passhash::cli::commands::version::execute(),
        Commands::Completions { ref shell } => passhash::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passhash::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
