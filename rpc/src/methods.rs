//! Node JSON-RPC method names.

pub const CLIENT_VERSION: &str = "web3_clientVersion";
pub const NET_VERSION: &str = "net_version";

pub const ACCOUNTS: &str = "eth_accounts";
pub const COINBASE: &str = "eth_coinbase";
pub const BLOCK_NUMBER: &str = "eth_blockNumber";

/// Balance of an account at a block.
pub const GET_BALANCE: &str = "eth_getBalance";
pub const GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
pub const GET_CODE: &str = "eth_getCode";

pub const GET_BLOCK_BY_HASH: &str = "eth_getBlockByHash";
pub const GET_BLOCK_BY_NUMBER: &str = "eth_getBlockByNumber";
pub const GET_TRANSACTION_BY_HASH: &str = "eth_getTransactionByHash";
pub const GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";

/// Read-only contract invocation.
pub const CALL: &str = "eth_call";
pub const ESTIMATE_GAS: &str = "eth_estimateGas";
/// Transaction signed by the node from one of its unlocked accounts.
pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";

/// Current proof-of-work package for external miners.
pub const GET_WORK: &str = "eth_getWork";
pub const SUBMIT_WORK: &str = "eth_submitWork";
