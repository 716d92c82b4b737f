//! Output formatting for CLI.

use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use 'human' or 'json'.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for commands that land a transaction.
#[derive(Debug, Serialize)]
pub struct TxOutput {
    /// Success line shown to humans.
    pub message: String,
    pub tx_hash: String,
    pub block_number: u64,
}

impl Render for TxOutput {
    fn render_human(&self) -> String {
        self.message.clone()
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `ifil balance-of`.
#[derive(Debug, Serialize)]
pub struct BalanceOutput {
    /// The address as the user typed it.
    pub address: String,
    /// Resolved EVM address.
    pub evm_address: String,
    /// Raw balance in atto-iFIL.
    pub balance_atto: String,
    /// Balance with nine decimals.
    pub balance: String,
}

impl Render for BalanceOutput {
    fn render_human(&self) -> String {
        format!("iFIL balance of {} is {}", self.address, self.balance)
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `wallet label-account`.
#[derive(Debug, Serialize)]
pub struct LabelOutput {
    pub name: String,
    pub address: String,
}

impl Render for LabelOutput {
    fn render_human(&self) -> String {
        format!(
            "{} {}",
            "Successfully added new read-only account to wallet -".green(),
            self.address
        )
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for `agent id`.
#[derive(Debug, Serialize)]
pub struct AgentOutput {
    pub address: Option<String>,
    pub native_address: Option<String>,
    pub id: Option<u64>,
    /// Whether this invocation changed the stored values.
    pub updated: bool,
}

impl Render for AgentOutput {
    fn render_human(&self) -> String {
        if self.address.is_none() && self.id.is_none() {
            return format!(
                "{} Try `glif agent id --address <address>`",
                "No agent configured.".yellow()
            );
        }
        let mut lines = Vec::new();
        if self.updated {
            lines.push(format!("{}", "Agent updated".green().bold()));
        }
        lines.push(format!(
            "{} {}",
            "Agent address:".bold(),
            self.address.as_deref().unwrap_or("-")
        ));
        if let Some(native) = &self.native_address {
            lines.push(format!("{} {}", "Native address:".bold(), native));
        }
        lines.push(format!(
            "{} {}",
            "Agent ID:".bold(),
            self.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
        ));
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One signing role in `wallet list`.
#[derive(Debug, Serialize)]
pub struct RoleEntry {
    pub role: String,
    pub evm_address: Option<String>,
    pub native_address: Option<String>,
}

/// One labeled account in `wallet list`.
#[derive(Debug, Serialize)]
pub struct LabelEntry {
    pub name: String,
    pub evm_address: String,
    pub native_address: String,
}

/// Output for `wallet list`.
#[derive(Debug, Serialize)]
pub struct WalletListOutput {
    pub roles: Vec<RoleEntry>,
    pub accounts: Vec<LabelEntry>,
    /// Warning about plaintext keys left in keys.toml.
    pub warning: Option<String>,
}

impl Render for WalletListOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![format!("{}", "Agent keys:".bold())];
        for role in &self.roles {
            match (&role.evm_address, &role.native_address) {
                (None, None) => {
                    lines.push(format!("  {:<14} {}", role.role, "(not set)".dimmed()))
                }
                (evm, native) => lines.push(format!(
                    "  {:<14} {} {}",
                    role.role,
                    evm.as_deref().unwrap_or("-"),
                    native.as_deref().unwrap_or("-")
                )),
            }
        }

        if !self.accounts.is_empty() {
            lines.push(String::new());
            lines.push(format!("{}", "Accounts:".bold()));
            for account in &self.accounts {
                lines.push(format!(
                    "  {:<14} {} {}",
                    account.name, account.evm_address, account.native_address
                ));
            }
        }

        if let Some(warning) = &self.warning {
            lines.push(String::new());
            lines.push(format!("{} {}", "Warning:".yellow().bold(), warning));
        }

        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One key moved by `wallet migrate`.
#[derive(Debug, Serialize)]
pub struct MigratedKey {
    pub role: String,
    pub address: String,
    /// False when the key was already in the keystore.
    pub imported: bool,
}

/// Output for `wallet migrate`.
#[derive(Debug, Serialize)]
pub struct MigrateOutput {
    pub migrated: Vec<MigratedKey>,
    pub keystore: String,
}

impl Render for MigrateOutput {
    fn render_human(&self) -> String {
        if self.migrated.is_empty() {
            return "No plaintext keys found in keys.toml".to_string();
        }
        let mut lines = vec![format!("{}", "Wallet migrated".green().bold())];
        for key in &self.migrated {
            let note = if key.imported { "" } else { " (already in keystore)" };
            lines.push(format!("  {:<10} {}{}", key.role, key.address, note));
        }
        lines.push(format!("{} {}", "Keystore:".bold(), self.keystore));
        lines.push(
            "Remove the private keys from keys.toml once you have a backup.".to_string(),
        );
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
