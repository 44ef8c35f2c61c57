//! EIP-1193 request plumbing.
//!
//! Two client shapes meet here: a wallet client that can dispatch
//! `{method, params}` requests for its active account, and an injected
//! provider object that speaks EIP-1193 directly. [`Transport`] picks one
//! of them once, when the adapter is built.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::wallet::WalletResult;

/// A `{method, params}` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Array(Vec::new())
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// A request with no parameters.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, empty_params())
    }
}

/// An injected EIP-1193 provider (browser extension, embedded wallet).
#[async_trait]
pub trait Eip1193Provider: Send + Sync {
    async fn request(&self, request: RpcRequest) -> WalletResult<Value>;
}

/// A connected wallet client.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Whether a wallet session is established.
    fn is_connected(&self) -> bool;

    /// The currently active account, if any.
    fn account(&self) -> Option<Address>;

    /// Dispatch a request through the client.
    async fn request(&self, request: RpcRequest) -> WalletResult<Value>;

    /// The raw provider behind this client, when it exposes one.
    fn injected_provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
        None
    }
}

/// The provider a signer talks through.
#[derive(Clone)]
pub enum Transport {
    /// The client's own injected provider.
    Injected(Arc<dyn Eip1193Provider>),
    /// Requests forwarded through the client's `request` method.
    Shim(Arc<dyn WalletClient>),
}

impl Transport {
    /// Prefer the injected provider; fall back to a request shim.
    pub fn resolve(client: Arc<dyn WalletClient>) -> Self {
        match client.injected_provider() {
            Some(provider) => Transport::Injected(provider),
            None => Transport::Shim(client),
        }
    }

    pub async fn request(&self, request: RpcRequest) -> WalletResult<Value> {
        tracing::trace!(method = %request.method, transport = self.kind(), "Wallet request");
        match self {
            Transport::Injected(provider) => provider.request(request).await,
            Transport::Shim(client) => client.request(request).await,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Transport::Injected(_) => "injected",
            Transport::Shim(_) => "shim",
        }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transport").field(&self.kind()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Eip1193Provider for Recorder {
        async fn request(&self, request: RpcRequest) -> WalletResult<Value> {
            self.seen.lock().unwrap().push(request.method);
            Ok(json!(self.name))
        }
    }

    struct Client {
        injected: Option<Arc<Recorder>>,
    }

    #[async_trait]
    impl WalletClient for Client {
        fn is_connected(&self) -> bool {
            true
        }

        fn account(&self) -> Option<Address> {
            Some(Address::ZERO)
        }

        async fn request(&self, _request: RpcRequest) -> WalletResult<Value> {
            Ok(json!("client"))
        }

        fn injected_provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
            self.injected
                .clone()
                .map(|p| p as Arc<dyn Eip1193Provider>)
        }
    }

    #[tokio::test]
    async fn test_prefers_injected_provider() {
        let injected = Arc::new(Recorder {
            name: "injected",
            seen: Mutex::new(Vec::new()),
        });
        let transport = Transport::resolve(Arc::new(Client {
            injected: Some(injected.clone()),
        }));
        assert_eq!(transport.kind(), "injected");

        let response = transport.request(RpcRequest::bare("eth_chainId")).await.unwrap();
        assert_eq!(response, json!("injected"));
        assert_eq!(*injected.seen.lock().unwrap(), vec!["eth_chainId".to_string()]);
    }

    #[tokio::test]
    async fn test_falls_back_to_shim() {
        let transport = Transport::resolve(Arc::new(Client { injected: None }));
        assert_eq!(transport.kind(), "shim");
        let response = transport.request(RpcRequest::bare("eth_chainId")).await.unwrap();
        assert_eq!(response, json!("client"));
    }

    #[test]
    fn test_request_serde_defaults_params() {
        let request: RpcRequest = serde_json::from_str(r#"{"method":"eth_accounts"}"#).unwrap();
        assert_eq!(request, RpcRequest::bare("eth_accounts"));
    }
}
