use clap::Parser;
use parka::cli::{handle_completions, handle_config_init, handle_services, Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => parka::cli::serve::run_serve(args).await,
        Commands::Services(args) => handle_services(&args).map(|output| println!("{}", output)),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
