// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Named clients with a designated default.

use crate::config::ClientsConfig;
use crate::error::{KubeDsnError, Result};
use crate::kubernetes::builder::build;
use crate::kubernetes::client::{Client, ClientFactory};
use crate::kubernetes::codec::Codec;
use crate::kubernetes::transport::Transport;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Client factories indexed by name, in registration order.
///
/// Clients are built on first lookup and shared afterwards; see [`ClientFactory::client`].
#[derive(Debug)]
pub struct ClientRegistry {
    factories: IndexMap<String, ClientFactory>,
    default_name: Option<String>,
}

impl ClientRegistry {
    /// An empty `default_name` is treated as no default. A non-empty one must be
    /// registered, unless the registry has no clients at all.
    pub fn new(
        factories: IndexMap<String, ClientFactory>,
        default_name: Option<String>,
    ) -> Result<Self> {
        let default_name = default_name.filter(|name| !name.is_empty());

        let registry = Self {
            factories,
            default_name,
        };

        if let Some(name) = &registry.default_name {
            if !registry.is_empty() && !registry.has(name) {
                return Err(registry.unknown_client(name));
            }
        }

        Ok(registry)
    }

    /// Build one factory per configured client, keeping configuration order
    #[instrument(skip_all, fields(clients = config.clients.len()))]
    pub fn from_config(
        config: &ClientsConfig,
        transport: Arc<dyn Transport>,
        codec: Option<Arc<dyn Codec>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut factories = IndexMap::with_capacity(config.clients.len());
        for (name, client) in &config.clients {
            debug!("Building client factory '{}'", name);
            let factory = build(&client.dsn, transport.clone(), codec.clone())?;
            factories.insert(name.clone(), factory);
        }

        let registry = Self::new(factories, config.resolve_default_client())?;
        info!(
            "Registered {} clients (default: {})",
            registry.len(),
            registry.default_name().unwrap_or("<none>")
        );
        Ok(registry)
    }

    pub async fn get(&self, name: &str) -> Result<Arc<Client>> {
        self.factory(name)?.client().await
    }

    pub async fn get_default(&self) -> Result<Arc<Client>> {
        match &self.default_name {
            Some(name) => self.get(name).await,
            None => Err(self.unknown_client("")),
        }
    }

    pub fn factory(&self, name: &str) -> Result<&ClientFactory> {
        self.factories
            .get(name)
            .ok_or_else(|| self.unknown_client(name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    fn unknown_client(&self, name: &str) -> KubeDsnError {
        KubeDsnError::UnknownClient {
            name: name.to_string(),
            available: self.factories.keys().cloned().collect(),
        }
    }
}
