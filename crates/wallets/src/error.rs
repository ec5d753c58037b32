//! EIP-1193 provider errors and the user-facing wallet error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::borrow::Cow;

/// Represents an EIP-1193 `ProviderRpcError`.
///
/// Wallets reject requests with the codes listed in
/// [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#provider-errors) and
/// [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085), nodes with the JSON-RPC 2.0 codes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ProviderRpcError {
    pub code: ErrorCode,
    /// error message
    pub message: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProviderRpcError {
    /// New [`ProviderRpcError`] with the given [`ErrorCode`].
    pub const fn new(code: ErrorCode) -> Self {
        Self { message: Cow::Borrowed(code.message()), code, data: None }
    }

    /// New [`ProviderRpcError`] with the given [`ErrorCode`] and message.
    pub fn with_message<M>(code: ErrorCode, message: M) -> Self
    where
        M: Into<String>,
    {
        Self { code, message: message.into().into(), data: None }
    }

    /// Attaches `data` to the error.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Creates a new `UserRejectedRequest` error.
    pub const fn user_rejected() -> Self {
        Self::new(ErrorCode::UserRejectedRequest)
    }

    /// Creates a new `UnrecognizedChain` error.
    pub const fn unrecognized_chain() -> Self {
        Self::new(ErrorCode::UnrecognizedChain)
    }

    /// Creates a new `Disconnected` error.
    pub const fn disconnected() -> Self {
        Self::new(ErrorCode::Disconnected)
    }

    /// Creates a new `MethodNotFound` error.
    pub const fn method_not_found() -> Self {
        Self::new(ErrorCode::MethodNotFound)
    }

    /// Creates a new `InternalError` error with a message.
    pub fn internal_error_with<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::with_message(ErrorCode::InternalError, message)
    }

    /// Returns the code of the error wrapped in `data`, if any.
    ///
    /// Some wallets (MetaMask mobile, WalletConnect relays) report the actual wallet error as
    /// `data.originalError.code` and put a generic code at the top level.
    pub fn nested_code(&self) -> Option<ErrorCode> {
        let data = self.data.as_ref()?;
        data.pointer("/originalError/code")
            .or_else(|| data.pointer("/code"))
            .and_then(Value::as_i64)
            .map(ErrorCode::from)
    }

    /// Returns `true` if the error, or the error it wraps, has the given code.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.code == code || self.nested_code() == Some(code)
    }

    /// Returns `true` if the user rejected the request in the wallet.
    pub fn is_user_rejection(&self) -> bool {
        self.has_code(ErrorCode::UserRejectedRequest)
    }

    /// Returns `true` if the wallet does not know the requested chain.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.has_code(ErrorCode::UnrecognizedChain)
    }
}

/// List of EIP-1193 and JSON-RPC error codes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    /// The user rejected the request.
    UserRejectedRequest,
    /// The requested method and/or account has not been authorized by the user.
    Unauthorized,
    /// The provider does not support the requested method.
    UnsupportedMethod,
    /// The provider is disconnected from all chains.
    Disconnected,
    /// The provider is not connected to the requested chain.
    ChainDisconnected,
    /// The chain has not been added to the wallet, see EIP-3085.
    UnrecognizedChain,
    /// Server received Invalid JSON.
    ParseError,
    /// send invalid request object.
    InvalidRequest,
    /// method does not exist or valid
    MethodNotFound,
    /// invalid method parameter.
    InvalidParams,
    /// internal call error
    InternalError,
    /// Any other code.
    Other(i64),
}

impl ErrorCode {
    /// Returns the error code as `i64`
    pub const fn code(&self) -> i64 {
        match *self {
            Self::UserRejectedRequest => 4001,
            Self::Unauthorized => 4100,
            Self::UnsupportedMethod => 4200,
            Self::Disconnected => 4900,
            Self::ChainDisconnected => 4901,
            Self::UnrecognizedChain => 4902,
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::Other(c) => c,
        }
    }

    /// Returns the message associated with the error
    pub const fn message(&self) -> &'static str {
        match *self {
            Self::UserRejectedRequest => "User rejected the request",
            Self::Unauthorized => "Unauthorized",
            Self::UnsupportedMethod => "Unsupported method",
            Self::Disconnected => "Disconnected",
            Self::ChainDisconnected => "Chain disconnected",
            Self::UnrecognizedChain => "Unrecognized chain ID",
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::Other(_) => "Wallet error",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'a> Deserialize<'a> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'a>,
    {
        i64::deserialize(deserializer).map(Into::into)
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            4001 => Self::UserRejectedRequest,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 => Self::Disconnected,
            4901 => Self::ChainDisconnected,
            4902 => Self::UnrecognizedChain,
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            _ => Self::Other(code),
        }
    }
}

/// Errors surfaced to the user while establishing a wallet session.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("No Ethereum wallet found. Please install Rabby or MetaMask.")]
    NotFound,
    #[error("Wallet connection rejected by user.")]
    Rejected(#[source] ProviderRpcError),
    #[error("Failed to switch to {chain}. Please do it manually.")]
    ChainSwitch {
        chain: String,
        #[source]
        source: ProviderRpcError,
    },
    #[error("The wallet did not expose any account.")]
    NoAccounts,
    #[error("{}", connection_failure(.0))]
    Connection(#[source] ProviderRpcError),
}

impl WalletError {
    /// Maps a failed account request to the matching category.
    pub(crate) fn from_connect(err: ProviderRpcError) -> Self {
        if err.is_user_rejection() { Self::Rejected(err) } else { Self::Connection(err) }
    }
}

fn connection_failure(err: &ProviderRpcError) -> &str {
    if err.message.trim().is_empty() { "Failed to connect wallet" } else { &err.message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wallet_errors() {
        let err: ProviderRpcError = serde_json::from_value(json!({
            "code": 4902,
            "message": "Unrecognized chain ID \"0x531\". Try adding the chain using wallet_addEthereumChain first."
        }))
        .unwrap();
        assert_eq!(err.code, ErrorCode::UnrecognizedChain);
        assert!(err.is_unrecognized_chain());
        assert!(!err.is_user_rejection());
    }

    #[test]
    fn detects_wrapped_codes() {
        let err = ProviderRpcError::internal_error_with("Internal JSON-RPC error.")
            .with_data(json!({ "originalError": { "code": 4902, "message": "unknown chain" } }));
        assert!(err.is_unrecognized_chain());

        let err = ProviderRpcError::with_message(ErrorCode::Other(-32000), "rejected")
            .with_data(json!({ "code": 4001 }));
        assert!(err.is_user_rejection());
    }

    #[test]
    fn roundtrips_unknown_codes() {
        let err = ProviderRpcError::with_message(ErrorCode::Other(-32000), "insufficient funds");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, json!({ "code": -32000, "message": "insufficient funds" }));
    }

    #[test]
    fn connection_failure_falls_back_to_default_message() {
        let err = WalletError::Connection(ProviderRpcError::with_message(ErrorCode::Other(1), ""));
        assert_eq!(err.to_string(), "Failed to connect wallet");
    }
}
