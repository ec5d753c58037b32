//! The wallet side of a command.

use std::{sync::Arc, time::Duration};

use eyre::{OptionExt, Result, WrapErr};
use oxie_config::{Config, WalletEndpoint};
use oxie_wallets::{
    DiscoveryBus, HttpProvider, ProviderDetail, ProviderInfo, ProviderRegistry, Session,
    WalletManager, bridge::BrowserBridge,
};
use tokio::task::JoinHandle;

/// How long announcements are collected before a wallet is picked.
pub const DISCOVERY_WINDOW: Duration = Duration::from_millis(500);

/// Announced endpoints, the optional browser bridge and the session manager of one command.
#[derive(Debug)]
pub struct Wallets {
    manager: Arc<WalletManager>,
    bridge: Option<BrowserBridge>,
    tasks: Vec<JoinHandle<()>>,
}

impl Wallets {
    /// Announces the configured wallet endpoints, sets `eth_rpc_url` as the injected provider
    /// and, with `browser`, starts the browser bridge.
    pub async fn start(config: &Config, browser: bool) -> Result<Self> {
        let bus = DiscoveryBus::new();
        let registry = ProviderRegistry::new();
        let mut tasks = vec![registry.listen(&bus)];

        let endpoints = config.wallets.iter().map(endpoint_detail).collect::<Result<Vec<_>>>()?;
        if !endpoints.is_empty() {
            tasks.push(bus.serve(endpoints));
        }

        let manager = WalletManager::new(registry, config.chain.clone());
        if let Some(url) = config.get_rpc_url() {
            let url = url.wrap_err("invalid `eth_rpc_url`")?;
            debug!(%url, "using rpc endpoint as injected provider");
            manager.set_injected(Some(Arc::new(HttpProvider::new(url))));
        }

        let bridge = if browser {
            let mut bridge =
                BrowserBridge::new(config.browser_port, config.browser_timeout(), bus.clone());
            bridge.start().await?;
            Some(bridge)
        } else {
            None
        };

        Ok(Self { manager: Arc::new(manager), bridge, tasks })
    }

    pub fn manager(&self) -> &Arc<WalletManager> {
        &self.manager
    }

    pub fn bridge(&self) -> Option<&BrowserBridge> {
        self.bridge.as_ref()
    }

    /// Waits for the browser page, if any, then gives wallets time to announce themselves.
    ///
    /// The page's `window.ethereum` replaces any other injected provider.
    pub async fn discover(&self) -> Result<()> {
        if let Some(bridge) = &self.bridge {
            let page = bridge.wait_for_page().await?;
            debug!(injected = page.injected, "browser page connected");
            if let Some(provider) = bridge.injected_provider() {
                self.manager.set_injected(Some(provider));
            }
        }
        tokio::time::sleep(DISCOVERY_WINDOW).await;
        Ok(())
    }

    /// Connects to the announced wallet matching `query`, or to the injected provider.
    pub async fn connect(&self, query: Option<&str>) -> Result<Session> {
        let detail = query
            .map(|query| {
                self.manager
                    .registry()
                    .find(query)
                    .ok_or_eyre(format!("no wallet matching `{query}` was announced"))
            })
            .transpose()?;
        Ok(self.manager.connect(detail.as_ref()).await?)
    }

    /// Stops the bridge and the discovery tasks.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(mut bridge) = self.bridge.take() {
            bridge.stop().await?;
        }
        Ok(())
    }
}

impl Drop for Wallets {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn endpoint_detail(endpoint: &WalletEndpoint) -> Result<ProviderDetail> {
    let provider = HttpProvider::try_new(&endpoint.url)
        .wrap_err_with(|| format!("invalid url of wallet `{}`", endpoint.name))?;
    let info = ProviderInfo {
        uuid: endpoint.uuid(),
        name: endpoint.name.clone(),
        icon: endpoint.icon.clone(),
        rdns: endpoint.rdns.clone(),
    };
    Ok(ProviderDetail::new(info, Arc::new(provider)))
}
