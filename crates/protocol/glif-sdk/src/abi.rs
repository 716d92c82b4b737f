//! Calldata for the handful of contract calls the CLI makes.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall, SolValue};
use glif_types::EthAddress;

use crate::error::{SdkError, SdkResult};

sol! {
    /// ERC-20 allowance grant on the iFIL token.
    function approve(address spender, uint256 amount) external returns (bool);

    /// ERC-20 balance lookup on the iFIL token.
    function balanceOf(address account) external view returns (uint256);

    /// Agent call accepting a miner's pending worker change.
    function confirmChangeMinerWorker(uint64 miner) external;
}

pub fn encode_approve(spender: &EthAddress, amount: U256) -> Vec<u8> {
    approveCall {
        spender: spender.address(),
        amount,
    }
    .abi_encode()
}

pub fn encode_balance_of(holder: &EthAddress) -> Vec<u8> {
    balanceOfCall {
        account: holder.address(),
    }
    .abi_encode()
}

pub fn encode_confirm_change_miner_worker(miner_id: u64) -> Vec<u8> {
    confirmChangeMinerWorkerCall { miner: miner_id }.abi_encode()
}

/// Decode a `uint256` return value; balances beyond 128 bits are rejected.
pub fn decode_balance(data: &[u8]) -> SdkResult<u128> {
    let value = U256::abi_decode(data)
        .map_err(|e| SdkError::invalid_response(format!("uint256 return value: {}", e)))?;
    u128::try_from(value)
        .map_err(|_| SdkError::invalid_response("uint256 value exceeds 128 bits"))
}
