//! The closed set of commands a statement can name.

use std::collections::HashMap;

use nodeshell_rpc::methods;
use serde_json::{json, Map, Value};

use crate::error::EvalError;
use crate::statement::Statement;

/// A parameter slot in a command's signature.
pub struct Param {
    pub name: &'static str,
    pub required: bool,
}

const fn req(name: &'static str) -> Param {
    Param {
        name,
        required: true,
    }
}

const fn opt(name: &'static str) -> Param {
    Param {
        name,
        required: false,
    }
}

/// Signature and one-line description of a command.
pub struct CommandSpec {
    pub name: &'static str,
    pub params: &'static [Param],
    pub summary: &'static str,
}

impl CommandSpec {
    /// e.g. `balance <address> [block]`
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for param in self.params {
            if param.required {
                usage.push_str(&format!(" <{}>", param.name));
            } else {
                usage.push_str(&format!(" [{}]", param.name));
            }
        }
        usage
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "help", params: &[], summary: "list the available commands" },
    CommandSpec { name: "client-version", params: &[], summary: "node software version" },
    CommandSpec { name: "network-id", params: &[], summary: "network identifier" },
    CommandSpec { name: "accounts", params: &[], summary: "accounts managed by the node" },
    CommandSpec { name: "coinbase", params: &[], summary: "address receiving mining rewards" },
    CommandSpec { name: "block-number", params: &[], summary: "number of the most recent block" },
    CommandSpec {
        name: "balance",
        params: &[req("address"), opt("block")],
        summary: "balance of an account",
    },
    CommandSpec {
        name: "nonce",
        params: &[req("address"), opt("block")],
        summary: "number of transactions sent from an account",
    },
    CommandSpec {
        name: "code",
        params: &[req("address"), opt("block")],
        summary: "contract code at an address",
    },
    CommandSpec {
        name: "block",
        params: &[req("id"), opt("full")],
        summary: "block by number, tag or hash",
    },
    CommandSpec { name: "tx", params: &[req("hash")], summary: "transaction by hash" },
    CommandSpec { name: "receipt", params: &[req("hash")], summary: "transaction receipt by hash" },
    CommandSpec {
        name: "call",
        params: &[req("to"), opt("data"), opt("from"), opt("block")],
        summary: "invoke a contract without creating a transaction",
    },
    CommandSpec {
        name: "estimate-gas",
        params: &[req("to"), opt("data"), opt("from"), opt("value")],
        summary: "gas a transaction would use",
    },
    CommandSpec {
        name: "send",
        params: &[
            req("from"),
            req("to"),
            opt("value"),
            opt("data"),
            opt("gas"),
            opt("gas-price"),
        ],
        summary: "send a transaction from an unlocked node account",
    },
    CommandSpec {
        name: "send-raw",
        params: &[req("data")],
        summary: "submit a signed, encoded transaction",
    },
    CommandSpec { name: "get-work", params: &[], summary: "current proof-of-work package" },
    CommandSpec {
        name: "submit-work",
        params: &[req("nonce"), req("pow-hash"), req("mix-digest")],
        summary: "submit a proof-of-work solution",
    },
    CommandSpec {
        name: "rpc",
        params: &[req("method"), opt("params")],
        summary: "call any method; params is a JSON array or object",
    },
];

/// A statement bound to a known command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Help,
    ClientVersion,
    NetworkId,
    Accounts,
    Coinbase,
    BlockNumber,
    Balance { address: String, block: String },
    Nonce { address: String, block: String },
    Code { address: String, block: String },
    BlockByHash { hash: String, full: bool },
    BlockByNumber { number: String, full: bool },
    Transaction { hash: String },
    Receipt { hash: String },
    Call { call: Value, block: String },
    EstimateGas { call: Value },
    Send { transaction: Value },
    SendRaw { data: String },
    GetWork,
    SubmitWork { nonce: String, pow_hash: String, mix_digest: String },
    Raw { method: String, params: Value },
}

/// A JSON-RPC method and its parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteCall {
    pub method: String,
    pub params: Value,
}

impl RemoteCall {
    fn new(method: &str, params: Value) -> Self {
        Self {
            method: method.to_string(),
            params,
        }
    }
}

impl Command {
    /// Bind a statement's arguments to the command it names.
    pub fn parse(statement: &Statement) -> Result<Self, EvalError> {
        let spec = COMMANDS
            .iter()
            .find(|spec| spec.name == statement.command)
            .ok_or_else(|| EvalError::UnknownCommand(statement.command.clone()))?;
        let mut args = Args::bind(spec, statement)?;

        let command = match spec.name {
            "help" => Command::Help,
            "client-version" => Command::ClientVersion,
            "network-id" => Command::NetworkId,
            "accounts" => Command::Accounts,
            "coinbase" => Command::Coinbase,
            "block-number" => Command::BlockNumber,
            "balance" => Command::Balance {
                address: args.take("address"),
                block: args.block("block")?,
            },
            "nonce" => Command::Nonce {
                address: args.take("address"),
                block: args.block("block")?,
            },
            "code" => Command::Code {
                address: args.take("address"),
                block: args.block("block")?,
            },
            "block" => {
                let id = args.take("id");
                let full = args.flag("full")?;
                if is_hash(&id) {
                    Command::BlockByHash { hash: id, full }
                } else {
                    Command::BlockByNumber {
                        number: block_tag(&id)?,
                        full,
                    }
                }
            }
            "tx" => Command::Transaction {
                hash: args.take("hash"),
            },
            "receipt" => Command::Receipt {
                hash: args.take("hash"),
            },
            "call" => Command::Call {
                call: args.object(&[("to", false), ("data", false), ("from", false)])?,
                block: args.block("block")?,
            },
            "estimate-gas" => Command::EstimateGas {
                call: args.object(&[("to", false), ("data", false), ("from", false), ("value", true)])?,
            },
            "send" => Command::Send {
                transaction: args.object(&[
                    ("from", false),
                    ("to", false),
                    ("value", true),
                    ("data", false),
                    ("gas", true),
                    ("gas-price", true),
                ])?,
            },
            "send-raw" => Command::SendRaw {
                data: args.take("data"),
            },
            "get-work" => Command::GetWork,
            "submit-work" => Command::SubmitWork {
                nonce: args.take("nonce"),
                pow_hash: args.take("pow-hash"),
                mix_digest: args.take("mix-digest"),
            },
            "rpc" => Command::Raw {
                method: args.take("method"),
                params: args.json_params("params")?,
            },
            other => return Err(EvalError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    /// The node call this command makes, or `None` for local commands.
    pub fn remote_call(&self) -> Option<RemoteCall> {
        let call = match self {
            Command::Help => return None,
            Command::ClientVersion => RemoteCall::new(methods::CLIENT_VERSION, json!([])),
            Command::NetworkId => RemoteCall::new(methods::NET_VERSION, json!([])),
            Command::Accounts => RemoteCall::new(methods::ACCOUNTS, json!([])),
            Command::Coinbase => RemoteCall::new(methods::COINBASE, json!([])),
            Command::BlockNumber => RemoteCall::new(methods::BLOCK_NUMBER, json!([])),
            Command::Balance { address, block } => {
                RemoteCall::new(methods::GET_BALANCE, json!([address, block]))
            }
            Command::Nonce { address, block } => {
                RemoteCall::new(methods::GET_TRANSACTION_COUNT, json!([address, block]))
            }
            Command::Code { address, block } => {
                RemoteCall::new(methods::GET_CODE, json!([address, block]))
            }
            Command::BlockByHash { hash, full } => {
                RemoteCall::new(methods::GET_BLOCK_BY_HASH, json!([hash, full]))
            }
            Command::BlockByNumber { number, full } => {
                RemoteCall::new(methods::GET_BLOCK_BY_NUMBER, json!([number, full]))
            }
            Command::Transaction { hash } => {
                RemoteCall::new(methods::GET_TRANSACTION_BY_HASH, json!([hash]))
            }
            Command::Receipt { hash } => {
                RemoteCall::new(methods::GET_TRANSACTION_RECEIPT, json!([hash]))
            }
            Command::Call { call, block } => RemoteCall::new(methods::CALL, json!([call, block])),
            Command::EstimateGas { call } => RemoteCall::new(methods::ESTIMATE_GAS, json!([call])),
            Command::Send { transaction } => {
                RemoteCall::new(methods::SEND_TRANSACTION, json!([transaction]))
            }
            Command::SendRaw { data } => {
                RemoteCall::new(methods::SEND_RAW_TRANSACTION, json!([data]))
            }
            Command::GetWork => RemoteCall::new(methods::GET_WORK, json!([])),
            Command::SubmitWork {
                nonce,
                pow_hash,
                mix_digest,
            } => RemoteCall::new(methods::SUBMIT_WORK, json!([nonce, pow_hash, mix_digest])),
            Command::Raw { method, params } => RemoteCall {
                method: method.clone(),
                params: params.clone(),
            },
        };
        Some(call)
    }
}

/// Help text listing every command.
pub fn help_text() -> String {
    let width = COMMANDS.iter().map(|spec| spec.usage().len()).max().unwrap_or(0);
    let mut text = String::from("commands:\n");
    for spec in COMMANDS {
        text.push_str(&format!("  {:<width$}  {}\n", spec.usage(), spec.summary));
    }
    text.push_str("  quit");
    text
}

/// Arguments bound to parameter names.
struct Args {
    values: HashMap<&'static str, String>,
}

impl Args {
    fn bind(spec: &CommandSpec, statement: &Statement) -> Result<Self, EvalError> {
        let usage = || format!("usage: {}", spec.usage());

        if statement.positional.len() > spec.params.len() {
            return Err(EvalError::Usage(format!("too many arguments; {}", usage())));
        }

        let mut values: HashMap<&'static str, String> = spec
            .params
            .iter()
            .zip(&statement.positional)
            .map(|(param, value)| (param.name, value.clone()))
            .collect();

        for (name, value) in &statement.keywords {
            let canonical = name.replace('_', "-");
            let param = spec
                .params
                .iter()
                .find(|param| param.name == canonical)
                .ok_or_else(|| EvalError::Usage(format!("unknown argument {name}; {}", usage())))?;
            if values.insert(param.name, value.clone()).is_some() {
                return Err(EvalError::Usage(format!("argument {name} given twice; {}", usage())));
            }
        }

        if let Some(missing) = spec
            .params
            .iter()
            .find(|param| param.required && !values.contains_key(param.name))
        {
            return Err(EvalError::Usage(format!(
                "missing argument <{}>; {}",
                missing.name,
                usage()
            )));
        }

        Ok(Self { values })
    }

    /// A required argument; presence was checked by `bind`.
    fn take(&mut self, name: &str) -> String {
        self.values.remove(name).unwrap_or_default()
    }

    fn block(&mut self, name: &str) -> Result<String, EvalError> {
        match self.values.remove(name) {
            Some(block) => block_tag(&block),
            None => Ok("latest".to_string()),
        }
    }

    fn flag(&mut self, name: &str) -> Result<bool, EvalError> {
        match self.values.remove(name).as_deref() {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(other) => Err(EvalError::Usage(format!(
                "{name} must be true or false, got {other}"
            ))),
        }
    }

    /// Collect the named arguments into a transaction-style object, keyed
    /// in camelCase. Entries flagged `true` are quantities.
    fn object(&mut self, fields: &[(&str, bool)]) -> Result<Value, EvalError> {
        let mut object = Map::new();
        for &(name, is_quantity) in fields {
            if let Some(value) = self.values.remove(name) {
                let value = if is_quantity { quantity(name, &value)? } else { value };
                object.insert(camel_case(name), Value::String(value));
            }
        }
        Ok(Value::Object(object))
    }

    fn json_params(&mut self, name: &str) -> Result<Value, EvalError> {
        let Some(raw) = self.values.remove(name) else {
            return Ok(json!([]));
        };
        let params: Value = serde_json::from_str(&raw)
            .map_err(|e| EvalError::Parse(format!("{name} is not valid JSON: {e}")))?;
        if params.is_array() || params.is_object() {
            Ok(params)
        } else {
            Err(EvalError::Usage(format!("{name} must be a JSON array or object")))
        }
    }
}

/// Normalize a block reference: tags and hex pass through, decimal numbers
/// become hex quantities.
fn block_tag(block: &str) -> Result<String, EvalError> {
    match block {
        "latest" | "pending" | "earliest" | "safe" | "finalized" => Ok(block.to_string()),
        hex if hex.starts_with("0x") => Ok(hex.to_string()),
        decimal => decimal
            .parse::<u64>()
            .map(|n| format!("0x{n:x}"))
            .map_err(|_| EvalError::Usage(format!("invalid block: {decimal}"))),
    }
}

/// Hex quantities pass through; decimal integers are converted.
fn quantity(name: &str, value: &str) -> Result<String, EvalError> {
    if value.starts_with("0x") {
        return Ok(value.to_string());
    }
    value
        .parse::<u128>()
        .map(|n| format!("0x{n:x}"))
        .map_err(|_| EvalError::Usage(format!("{name} must be a number, got {value}")))
}

/// A 32-byte hex hash.
fn is_hash(id: &str) -> bool {
    id.len() == 66 && id.starts_with("0x") && id[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> Result<Command, EvalError> {
        Command::parse(&Statement::parse(line).unwrap().unwrap())
    }

    fn call(line: &str) -> RemoteCall {
        command(line).unwrap().remote_call().unwrap()
    }

    #[test]
    fn balance_defaults_to_latest() {
        assert_eq!(
            call("balance 0xabc"),
            RemoteCall::new(methods::GET_BALANCE, json!(["0xabc", "latest"]))
        );
    }

    #[test]
    fn decimal_block_becomes_hex() {
        assert_eq!(
            call("balance 0xabc 255"),
            RemoteCall::new(methods::GET_BALANCE, json!(["0xabc", "0xff"]))
        );
    }

    #[test]
    fn positional_and_keyword_forms_agree() {
        assert_eq!(call("nonce 0xabc pending"), call("nonce address=0xabc block=pending"));
        assert_eq!(call("nonce 0xabc pending"), call("nonce block=pending 0xabc"));
    }

    #[test]
    fn block_picks_lookup_by_shape() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert_eq!(
            call(&format!("block {hash} full=true")),
            RemoteCall::new(methods::GET_BLOCK_BY_HASH, json!([hash, true]))
        );
        assert_eq!(
            call("block 16"),
            RemoteCall::new(methods::GET_BLOCK_BY_NUMBER, json!(["0x10", false]))
        );
    }

    #[test]
    fn call_builds_call_object() {
        assert_eq!(
            call("call 0xcontract data=0x70a08231 from=0xme"),
            RemoteCall::new(
                methods::CALL,
                json!([{"to": "0xcontract", "data": "0x70a08231", "from": "0xme"}, "latest"])
            )
        );
    }

    #[test]
    fn send_converts_quantities_and_camel_cases() {
        assert_eq!(
            call("send 0xfrom 0xto value=1000 gas_price=0x3b9aca00"),
            RemoteCall::new(
                methods::SEND_TRANSACTION,
                json!([{"from": "0xfrom", "to": "0xto", "value": "0x3e8", "gasPrice": "0x3b9aca00"}])
            )
        );
    }

    #[test]
    fn submit_work_passes_three_values() {
        assert_eq!(
            call("submit-work 0x1 0x2 0x3"),
            RemoteCall::new(methods::SUBMIT_WORK, json!(["0x1", "0x2", "0x3"]))
        );
    }

    #[test]
    fn raw_call_takes_json_params() {
        assert_eq!(
            call(r#"rpc eth_getStorageAt ["0xabc", "0x0", "latest"]"#),
            RemoteCall::new("eth_getStorageAt", json!(["0xabc", "0x0", "latest"]))
        );
        assert_eq!(call("rpc eth_syncing"), RemoteCall::new("eth_syncing", json!([])));
    }

    #[test]
    fn raw_call_rejects_scalar_params() {
        assert!(matches!(command("rpc eth_syncing 5"), Err(EvalError::Usage(_))));
        assert!(matches!(command("rpc eth_syncing [oops"), Err(EvalError::Parse(_))));
    }

    #[test]
    fn help_is_local() {
        assert_eq!(command("help").unwrap().remote_call(), None);
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(command("mine"), Err(EvalError::UnknownCommand(ref c)) if c == "mine"));
    }

    #[test]
    fn usage_errors() {
        assert!(matches!(command("balance"), Err(EvalError::Usage(_))));
        assert!(matches!(command("tx 0x1 0x2"), Err(EvalError::Usage(_))));
        assert!(matches!(command("tx hash=0x1 color=red"), Err(EvalError::Usage(_))));
        assert!(matches!(command("tx 0x1 hash=0x2"), Err(EvalError::Usage(_))));
        assert!(matches!(command("block 12 full=maybe"), Err(EvalError::Usage(_))));
        assert!(matches!(command("balance 0xabc yesterday"), Err(EvalError::Usage(_))));
        assert!(matches!(command("send 0x1 0x2 value=lots"), Err(EvalError::Usage(_))));
    }

    #[test]
    fn usage_message_shows_signature() {
        let err = command("submit-work 0x1").unwrap_err();
        assert!(err
            .to_string()
            .contains("usage: submit-work <nonce> <pow-hash> <mix-digest>"));
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for spec in COMMANDS {
            assert!(help.contains(spec.name), "{} missing from help", spec.name);
        }
        assert!(help.contains("quit"));
    }
}
