// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Credential strategies and their resolution into a kube client configuration.

use crate::dsn::Provider;
use crate::error::{KubeDsnError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::Config as KConfig;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use url::Url;

/// Name used for the cluster, user and context of a synthesized kubeconfig
const DIRECT_ENTRY_NAME: &str = "direct";

/// How a client obtains its API server address and credentials
#[derive(Debug)]
pub enum CredentialStrategy {
    /// Explicit API server URL with optional token, TLS material and basic auth
    DirectEndpoint(DirectEndpoint),
    /// Service account token and CA bundle mounted into the pod
    InCluster,
    /// A kubeconfig file, optionally pinned to a context
    KubeConfigFile {
        path: PathBuf,
        context: Option<String>,
    },
}

#[derive(Debug)]
pub struct DirectEndpoint {
    pub endpoint: Url,
    /// Inline bearer token, or a path to a file holding one
    pub token: Option<SecretString>,
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub basic_auth_user: Option<String>,
    pub basic_auth_password: Option<SecretString>,
}

impl CredentialStrategy {
    pub fn provider(&self) -> Provider {
        match self {
            CredentialStrategy::DirectEndpoint(_) => Provider::Http,
            CredentialStrategy::InCluster => Provider::InCluster,
            CredentialStrategy::KubeConfigFile { .. } => Provider::KubeConfig,
        }
    }

    /// Resolve the strategy into a client configuration.
    ///
    /// This is where files are read and the runtime environment is inspected.
    #[instrument(skip(self), fields(provider = %self.provider()))]
    pub async fn resolve(&self) -> Result<KConfig> {
        match self {
            CredentialStrategy::DirectEndpoint(direct) => direct.resolve().await,
            CredentialStrategy::InCluster => KConfig::incluster().map_err(|e| {
                KubeDsnError::Kubeconfig(format!("Failed to load in-cluster config: {}", e))
            }),
            CredentialStrategy::KubeConfigFile { path, context } => {
                debug!("Reading kubeconfig from {}", path.display());
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    KubeDsnError::Kubeconfig(format!(
                        "Failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let options = KubeConfigOptions {
                    context: context.clone(),
                    ..Default::default()
                };
                from_kubeconfig(kubeconfig, &options).await
            }
        }
    }
}

impl DirectEndpoint {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            token: None,
            ca_file: None,
            cert_file: None,
            key_file: None,
            basic_auth_user: None,
            basic_auth_password: None,
        }
    }

    async fn resolve(&self) -> Result<KConfig> {
        let kubeconfig = self.to_kubeconfig()?;
        let options = KubeConfigOptions {
            context: Some(DIRECT_ENTRY_NAME.to_string()),
            ..Default::default()
        };
        from_kubeconfig(kubeconfig, &options).await
    }

    /// Describe this endpoint as a single-context kubeconfig document
    fn to_kubeconfig(&self) -> Result<Kubeconfig> {
        let mut cluster = Map::new();
        cluster.insert("server".into(), json!(self.endpoint.as_str()));
        insert_path(&mut cluster, "certificate-authority", self.ca_file.as_deref());

        let mut user = Map::new();
        if let Some(token) = &self.token {
            let token = token.expose_secret();
            // A token naming an existing file is handed to kube as a token file
            if Path::new(token).is_file() {
                user.insert("tokenFile".into(), json!(token));
            } else {
                user.insert("token".into(), json!(token));
            }
        }
        insert_path(&mut user, "client-certificate", self.cert_file.as_deref());
        insert_path(&mut user, "client-key", self.key_file.as_deref());
        if let Some(username) = &self.basic_auth_user {
            user.insert("username".into(), json!(username));
        }
        if let Some(password) = &self.basic_auth_password {
            user.insert("password".into(), json!(password.expose_secret()));
        }

        let document = json!({
            "apiVersion": "v1",
            "kind": "Config",
            "clusters": [{ "name": DIRECT_ENTRY_NAME, "cluster": Value::Object(cluster) }],
            "users": [{ "name": DIRECT_ENTRY_NAME, "user": Value::Object(user) }],
            "contexts": [{
                "name": DIRECT_ENTRY_NAME,
                "context": { "cluster": DIRECT_ENTRY_NAME, "user": DIRECT_ENTRY_NAME }
            }],
            "current-context": DIRECT_ENTRY_NAME,
        });

        serde_json::from_value(document).map_err(|e| {
            KubeDsnError::Kubeconfig(format!(
                "Failed to describe endpoint {}: {}",
                self.endpoint, e
            ))
        })
    }
}

fn insert_path(entry: &mut Map<String, Value>, key: &str, path: Option<&Path>) {
    if let Some(path) = path {
        entry.insert(key.to_string(), json!(path.to_string_lossy()));
    }
}

async fn from_kubeconfig(kubeconfig: Kubeconfig, options: &KubeConfigOptions) -> Result<KConfig> {
    KConfig::from_custom_kubeconfig(kubeconfig, options)
        .await
        .map_err(|e| KubeDsnError::Kubeconfig(format!("Failed to create config: {}", e)))
}
