//! GLIF CLI binary entry point.

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glif_cli::{
    cli::{AgentCommands, Cli, Commands, IfilCommands, MinerCommands, WalletCommands},
    commands,
    config::{default_config_path, CliConfig},
    context::AppContext,
    error::{CliError, CliResult},
    output::OutputFormat,
};

const LOG_TARGETS: [&str; 4] = ["glif_cli", "glif_sdk", "glif_store", "glif_types"];

fn main() {
    // Parse CLI arguments before creating the tokio runtime
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let e = CliError::from(e);
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = rt.block_on(run(cli)) {
        print_error(&e);
        std::process::exit(e.exit_code());
    }
}

/// Logging to stderr. `--verbose` raises the glif crates to debug;
/// `RUST_LOG` replaces the defaults entirely.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect();
        EnvFilter::new(directives.join(","))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .with(filter)
        .init();
}

/// Print a user-friendly error message with error kind and recovery hint.
fn print_error(e: &CliError) {
    eprintln!(
        "{} [{}]: {}",
        "Error".red().bold(),
        e.kind().to_string().yellow(),
        e
    );

    if let Some(hint) = e.hint() {
        eprintln!("{}: {}", "Hint".cyan(), hint);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Completions need no configuration or stores
    if let Commands::Completions { shell } = cli.command {
        commands::completions(shell)?;
        return Ok(());
    }

    // Load configuration
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = CliConfig::load(&config_path)?;

    let format: OutputFormat = cli.format.into();
    let mut ctx = AppContext::load(config, format)?;

    // Dispatch command
    let output = match cli.command {
        Commands::Agent(AgentCommands::Id { address, id }) => {
            commands::agent_id(&mut ctx, address.as_deref(), id).await?
        }

        Commands::Agent(AgentCommands::Miners(MinerCommands::ConfirmWorker { miner, agent })) => {
            commands::confirm_worker(&mut ctx, &miner, &agent).await?
        }

        Commands::Ifil(IfilCommands::Approve {
            spender,
            allowance,
            from,
            agent,
        }) => commands::ifil_approve(&mut ctx, &spender, &allowance, &from, &agent).await?,

        Commands::Ifil(IfilCommands::BalanceOf { address }) => {
            commands::ifil_balance_of(&ctx, &address).await?
        }

        Commands::Wallet(WalletCommands::LabelAccount { name, address }) => {
            commands::label_account(&mut ctx, &name, &address).await?
        }

        Commands::Wallet(WalletCommands::List) => commands::wallet_list(&ctx)?,

        Commands::Wallet(WalletCommands::Migrate) => commands::wallet_migrate(&mut ctx)?,

        Commands::Completions { .. } => String::new(),
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
