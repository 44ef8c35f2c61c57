//! Wallet client → transaction signer bridge.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::wallet::eip1193::{RpcRequest, Transport, WalletClient};
use crate::wallet::signer::{ConfirmationPolicy, WalletSigner};
use crate::wallet::{WalletError, WalletResult};

/// Provider wrapper that hands out signers for wallet accounts.
#[derive(Debug, Clone)]
pub struct WalletProvider {
    transport: Transport,
    policy: ConfirmationPolicy,
}

impl WalletProvider {
    pub fn new(transport: Transport, policy: ConfirmationPolicy) -> Self {
        Self { transport, policy }
    }

    /// Request account access and bind a signer to `address`.
    ///
    /// This may prompt the wallet's user. The address must be among the
    /// accounts the wallet grants.
    pub async fn get_signer(&self, address: Address) -> WalletResult<WalletSigner> {
        let response = self
            .transport
            .request(RpcRequest::bare("eth_requestAccounts"))
            .await?;

        let accounts: Vec<Address> =
            serde_json::from_value(response).map_err(|e| WalletError::BadResponse {
                method: "eth_requestAccounts",
                message: e.to_string(),
            })?;

        if !accounts.contains(&address) {
            return Err(WalletError::AccountUnavailable(address));
        }

        Ok(WalletSigner::new(self.transport.clone(), address, self.policy))
    }
}

/// Turns a connected wallet client into a [`WalletSigner`].
///
/// The transport is chosen once here: the client's injected provider when
/// it has one, otherwise a shim over its `request` method.
#[derive(Debug, Clone)]
pub struct SignerAdapter {
    provider: WalletProvider,
    account: Option<Address>,
    connected: bool,
}

impl SignerAdapter {
    pub fn new(client: Arc<dyn WalletClient>, policy: ConfirmationPolicy) -> Self {
        let connected = client.is_connected();
        let account = client.account();
        let transport = Transport::resolve(client);

        tracing::debug!(
            transport = transport.kind(),
            connected,
            account = ?account,
            "Signer adapter built"
        );

        Self {
            provider: WalletProvider::new(transport, policy),
            account,
            connected,
        }
    }

    /// Obtain a signer for the wallet's active account.
    pub async fn signer(&self) -> WalletResult<WalletSigner> {
        let address = match (self.connected, self.account) {
            (true, Some(address)) => address,
            _ => return Err(WalletError::NotConnected),
        };
        self.provider.get_signer(address).await
    }
}

/// Signer for `client`, or [`WalletError::NotConnected`] when there is none.
pub async fn acquire_signer(
    client: Option<&Arc<dyn WalletClient>>,
    policy: ConfirmationPolicy,
) -> WalletResult<WalletSigner> {
    let client = client.ok_or(WalletError::NotConnected)?;
    SignerAdapter::new(Arc::clone(client), policy).signer().await
}
