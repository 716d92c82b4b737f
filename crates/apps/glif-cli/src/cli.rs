//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// GLIF Pools CLI.
#[derive(Parser, Debug)]
#[command(name = "glif")]
#[command(author = "GLIF Contributors")]
#[command(version)]
#[command(about = "Manage GLIF Pools agents, wallets and iFIL")]
#[command(
    long_about = "glif manages your GLIF Pools agent: its signing keys, miner worker changes and iFIL allowances.\n\nRun 'glif wallet migrate' once to move plaintext keys into the encrypted keystore."
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human or json).
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormatArg,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output format argument for clap.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormatArg {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Flags selecting which agent a command acts on.
#[derive(Args, Debug, Clone, Default)]
pub struct AgentArgs {
    /// Agent address (defaults to the one in agent.toml).
    #[arg(long = "agent-addr")]
    pub agent_addr: Option<String>,

    /// Agent ID (defaults to the one in agent.toml).
    #[arg(long = "agent-id")]
    pub agent_id: Option<u64>,
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Agent commands.
    #[command(subcommand)]
    Agent(AgentCommands),

    /// iFIL token commands.
    #[command(subcommand)]
    Ifil(IfilCommands),

    /// Wallet and account commands.
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// `glif agent ...`
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Show or set the stored agent address and ID.
    Id {
        /// Agent address to store (0x or native form).
        #[arg(long)]
        address: Option<String>,

        /// Agent ID to store.
        #[arg(long)]
        id: Option<u64>,
    },

    /// Miner commands.
    #[command(subcommand)]
    Miners(MinerCommands),
}

/// `glif agent miners ...`
#[derive(Subcommand, Debug)]
pub enum MinerCommands {
    /// Confirm the worker address change of your miner.
    ConfirmWorker {
        /// Miner address.
        miner: String,

        #[command(flatten)]
        agent: AgentArgs,
    },
}

/// `glif ifil ...`
#[derive(Subcommand, Debug)]
pub enum IfilCommands {
    /// Approve another address to spend your iFIL.
    Approve {
        /// Address allowed to spend (0x or native form).
        spender: String,

        /// Allowance in atto-iFIL.
        allowance: String,

        /// Address of the owner or operator of the agent.
        #[arg(long, default_value = "")]
        from: String,

        #[command(flatten)]
        agent: AgentArgs,
    },

    /// Get the iFIL balance of an address.
    BalanceOf {
        /// Address to check (0x or native form).
        address: String,
    },
}

/// `glif wallet ...`
#[derive(Subcommand, Debug)]
pub enum WalletCommands {
    /// Label an account with a human readable name.
    LabelAccount {
        /// Label to create.
        name: String,

        /// Address or existing label.
        address: String,
    },

    /// List agent keys and labeled accounts.
    List,

    /// Move plaintext keys from keys.toml into the encrypted keystore.
    Migrate,
}

/// Shell types for completions.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
