// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kube_dsn::config::Config;
use kube_dsn::kubernetes::HyperTransport;
use kube_dsn::{ClientRegistry, KubeDsnError};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting kube-dsn");

    let config = Config::from_env()?;
    let clients = config.load_clients()?;
    info!("Configuration loaded: {} clients", clients.clients.len());

    let registry = ClientRegistry::from_config(&clients, Arc::new(HyperTransport), None)?;

    // Probe every client, collecting failures instead of stopping at the first
    let probes = registry.names().into_iter().map(|name| {
        let registry = &registry;
        async move {
            let result = async {
                let client = registry.get(name).await?;
                let version = client.kube().apiserver_version().await?;
                Ok::<_, KubeDsnError>(version.git_version)
            }
            .await;
            (name, result)
        }
    });

    let mut failures = 0;
    for (name, result) in join_all(probes).await {
        match result {
            Ok(version) => info!("Client '{}' connected to Kubernetes {}", name, version),
            Err(e) => {
                failures += 1;
                error!("Client '{}' probe failed: {}", name, e);
            }
        }
    }

    match registry.get_default().await {
        Ok(client) => info!(
            "Default client '{}' uses namespace '{}'",
            registry.default_name().unwrap_or_default(),
            client.default_namespace()
        ),
        Err(e) => warn!("No usable default client: {}", e),
    }

    anyhow::ensure!(failures == 0, "{} of {} clients failed", failures, registry.len());
    Ok(())
}
