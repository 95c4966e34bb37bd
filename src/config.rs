// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env as vars, DEFAULT_CLIENT_NAME};
use crate::error::{KubeDsnError, Result};
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Process configuration loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// YAML file describing the named clients
    pub config_file: Option<PathBuf>,
    /// Single DSN registered under the default client name
    pub dsn: Option<String>,
    pub default_client: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let config_file = lookup(vars::CONFIG_FILE).map(PathBuf::from);
        let dsn = lookup(vars::DSN).filter(|dsn| !dsn.is_empty());
        let default_client = lookup(vars::DEFAULT_CLIENT).filter(|name| !name.is_empty());

        anyhow::ensure!(
            config_file.is_some() || dsn.is_some(),
            "Neither {} nor {} environment variable is set",
            vars::CONFIG_FILE,
            vars::DSN
        );

        Ok(Config {
            config_file,
            dsn,
            default_client,
        })
    }

    /// Merge the clients file with the environment overrides
    pub fn load_clients(&self) -> anyhow::Result<ClientsConfig> {
        let mut clients = match &self.config_file {
            Some(path) => ClientsConfig::from_file(path)
                .with_context(|| format!("Failed to load clients from {}", path.display()))?,
            None => ClientsConfig::default(),
        };

        if let Some(default_client) = &self.default_client {
            clients.default_client = Some(default_client.clone());
        }

        if let Some(dsn) = &self.dsn {
            let name = clients
                .default_client
                .clone()
                .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string());
            debug!("Registering client '{}' from {}", name, vars::DSN);
            clients.clients.insert(name, ClientConfig { dsn: dsn.clone() });
        }

        clients.validate()?;
        Ok(clients)
    }
}

/// Named client definitions, usually read from YAML:
///
/// ```yaml
/// clients:
///   production:
///     dsn: kube://http?endpoint=https://api.k8s.local:6443&token=/run/secrets/token
///   staging:
///     dsn: kube://kubeconfig?path=/etc/kube/staging.yaml&context=staging
/// default_client: production
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsConfig {
    pub clients: IndexMap<String, ClientConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_client: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub dsn: String,
}

impl ClientsConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ClientsConfig = serde_yaml::from_str(yaml)
            .map_err(|e| KubeDsnError::Config(format!("Failed to parse clients: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|e| {
            KubeDsnError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clients.is_empty() {
            return Err(KubeDsnError::Config(
                "At least one client must be configured".to_string(),
            ));
        }

        for (name, client) in &self.clients {
            if name.is_empty() {
                return Err(KubeDsnError::Config("Client names must not be empty".to_string()));
            }
            if client.dsn.trim().is_empty() {
                return Err(KubeDsnError::Config(format!(
                    "Client \"{}\" has an empty dsn",
                    name
                )));
            }
        }

        Ok(())
    }

    /// The explicit default, or a client named `default` when there is one
    pub fn resolve_default_client(&self) -> Option<String> {
        match &self.default_client {
            Some(name) => Some(name.clone()),
            None if self.clients.contains_key(DEFAULT_CLIENT_NAME) => {
                Some(DEFAULT_CLIENT_NAME.to_string())
            }
            None => None,
        }
    }
}
