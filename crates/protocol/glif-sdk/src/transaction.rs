//! EIP-1559 transaction signing with keystore keys.

use alloy_consensus::{SignableTransaction, TxEnvelope};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Signature, U256};
use glif_store::PrivateKey;
use secp256k1::{Message, Secp256k1};

pub use alloy_consensus::TxEip1559;

/// Sign `tx` and return the typed envelope for `eth_sendRawTransaction`.
pub fn sign_eip1559(tx: TxEip1559, key: &PrivateKey) -> Vec<u8> {
    let secp = Secp256k1::signing_only();
    let message = Message::from_digest(tx.signature_hash().0);
    let (recovery_id, compact) = secp
        .sign_ecdsa_recoverable(&message, key.secret_key())
        .serialize_compact();

    let signature = Signature::new(
        U256::from_be_slice(&compact[..32]),
        U256::from_be_slice(&compact[32..]),
        recovery_id.to_i32() == 1,
    );
    TxEnvelope::from(tx.into_signed(signature)).encoded_2718()
}
