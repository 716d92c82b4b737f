//! Signing wallets and the signer bundle handed to mutating calls.

use std::fmt;
use std::sync::Arc;

use glif_store::KeyStore;
use glif_types::{Account, FilAddress};
use tracing::debug;

use crate::error::{SdkError, SdkResult};
use crate::transaction::{sign_eip1559, TxEip1559};

/// Something that can sign transactions for a single account.
pub trait Wallet: Send + Sync {
    /// The account this wallet signs for.
    fn account(&self) -> &Account;

    /// Sign `tx`, unlocking the key with `passphrase`.
    fn sign_transaction(&self, tx: &TxEip1559, passphrase: &str) -> SdkResult<Vec<u8>>;
}

/// Wallet backed by the local encrypted keystore.
pub struct KeystoreWallet {
    keystore: KeyStore,
    account: Account,
}

impl KeystoreWallet {
    /// Find the keystore entry for `account`.
    ///
    /// Native accounts need a hardware wallet and always fail.
    pub fn find(keystore: &KeyStore, account: &Account) -> SdkResult<Self> {
        match account {
            Account::Eth(addr) => {
                if !keystore.contains(addr) {
                    return Err(SdkError::wallet(format!("unknown account {}", addr)));
                }
                Ok(Self {
                    keystore: keystore.clone(),
                    account: account.clone(),
                })
            }
            Account::Fil(_) => Err(SdkError::LedgerNotFound),
        }
    }
}

impl Wallet for KeystoreWallet {
    fn account(&self) -> &Account {
        &self.account
    }

    fn sign_transaction(&self, tx: &TxEip1559, passphrase: &str) -> SdkResult<Vec<u8>> {
        let addr = self
            .account
            .eth_address()
            .ok_or_else(|| SdkError::wallet("keystore wallet holds a native account"))?;
        let key = self.keystore.unlock(&addr, passphrase)?;
        debug!(from = %addr, nonce = tx.nonce, "Signing transaction");
        Ok(sign_eip1559(tx.clone(), &key))
    }
}

/// Everything a mutating call needs to sign as a particular role.
#[derive(Clone)]
pub struct Signer {
    pub wallet: Arc<dyn Wallet>,
    pub passphrase: String,
    /// Multisig proposer, when the owner is a multisig
    pub proposer: Option<FilAddress>,
    /// Multisig approver, when the owner is a multisig
    pub approver: Option<FilAddress>,
}

impl Signer {
    pub fn new(wallet: Arc<dyn Wallet>, passphrase: impl Into<String>) -> Self {
        Self {
            wallet,
            passphrase: passphrase.into(),
            proposer: None,
            approver: None,
        }
    }

    pub fn account(&self) -> &Account {
        self.wallet.account()
    }

    pub fn sign(&self, tx: &TxEip1559) -> SdkResult<Vec<u8>> {
        self.wallet.sign_transaction(tx, &self.passphrase)
    }

    /// Reject native owners that carry multisig proposer/approver roles.
    ///
    /// EVM accounts always sign alone; the roles are ignored for them.
    pub fn ensure_single_signer(&self) -> SdkResult<()> {
        let multisig = self.proposer.is_some() || self.approver.is_some();
        match self.account() {
            Account::Fil(_) if multisig => Err(SdkError::MultisigOwner),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("account", self.account())
            .field("proposer", &self.proposer)
            .field("approver", &self.approver)
            .finish_non_exhaustive()
    }
}
