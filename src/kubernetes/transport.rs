// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport seam between resolved credentials and a live client.

use crate::error::{KubeDsnError, Result};
use kube::{Client, Config as KConfig};
use std::fmt;

/// Turns a resolved client configuration into a client that can issue requests.
///
/// Hosts inject their own implementation to control how requests leave the
/// process (custom connectors, proxies, mocks in tests).
pub trait Transport: Send + Sync + fmt::Debug {
    fn connect(&self, config: KConfig) -> Result<Client>;
}

/// kube's own hyper + rustls stack
#[derive(Debug, Default, Clone, Copy)]
pub struct HyperTransport;

impl Transport for HyperTransport {
    fn connect(&self, config: KConfig) -> Result<Client> {
        let cluster_url = config.cluster_url.clone();
        Client::try_from(config).map_err(|e| {
            KubeDsnError::Kubeconfig(format!(
                "Failed to create client for {}: {}",
                cluster_url, e
            ))
        })
    }
}
