// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Connection string parsing and per-provider validation.
//!
//! Supported formats:
//! - `kube://http?endpoint=<url>&token=<path|value>&ca=<path>&cert=<path>&key=<path>`
//! - `kube://in-cluster`
//! - `kube://kubeconfig?path=<filepath>&context=<name>`

use crate::constants::{params, providers, SCHEME};
use crate::error::{KubeDsnError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use url::Url;

/// Credential-acquisition strategies selectable from a DSN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Http,
    InCluster,
    KubeConfig,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Http, Provider::InCluster, Provider::KubeConfig];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Http => providers::HTTP,
            Provider::InCluster => providers::IN_CLUSTER,
            Provider::KubeConfig => providers::KUBECONFIG,
        }
    }

    /// Comma separated list of every supported identifier
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = KubeDsnError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            providers::HTTP => Ok(Provider::Http),
            providers::IN_CLUSTER => Ok(Provider::InCluster),
            providers::KUBECONFIG => Ok(Provider::KubeConfig),
            other => Err(KubeDsnError::UnknownProvider(other.to_string())),
        }
    }
}

/// A parsed connection string: the provider token plus its raw query parameters.
///
/// Parameters are kept uninterpreted; each strategy decides what they mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    provider: String,
    parameters: BTreeMap<String, String>,
}

impl ConnectionDescriptor {
    /// Build a descriptor without going through the parser.
    ///
    /// Only the non-empty provider invariant is checked here; provider support
    /// is left to whoever consumes the descriptor.
    pub fn new(provider: impl Into<String>, parameters: BTreeMap<String, String>) -> Result<Self> {
        let provider = provider.into();
        if provider.is_empty() {
            return Err(KubeDsnError::InvalidConnectionString(
                "Provider must not be empty".to_string(),
            ));
        }

        Ok(Self {
            provider,
            parameters,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn get_parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn get_parameter_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_parameter(key).unwrap_or(default)
    }

    pub fn has_parameter(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = KubeDsnError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Parse and validate a `kube://` connection string.
pub fn parse(dsn: &str) -> Result<ConnectionDescriptor> {
    let result = split(dsn).and_then(|descriptor| {
        validate(&descriptor)?;
        Ok(descriptor)
    });

    if let Err(e) = &result {
        debug!("Rejected connection string: {}", e);
    }

    result
}

/// Parse an API server URL, requiring an absolute URL with a host.
pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url> {
    Url::parse(endpoint)
        .ok()
        .filter(Url::has_host)
        .ok_or_else(|| invalid(format!("Invalid endpoint URL: \"{endpoint}\"")))
}

fn invalid(message: String) -> KubeDsnError {
    KubeDsnError::InvalidConnectionString(message)
}

fn missing_provider(dsn: &str) -> KubeDsnError {
    invalid(format!("Missing provider in DSN: \"{dsn}\""))
}

/// Split the DSN into its authority (provider) and decoded query parameters.
fn split(dsn: &str) -> Result<ConnectionDescriptor> {
    let Some(rest) = dsn.strip_prefix(SCHEME) else {
        return Err(invalid(format!(
            "Invalid DSN scheme. Expected \"{SCHEME}\", got \"{dsn}\""
        )));
    };

    let authority_end = rest
        .find(|c| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    if rest[..authority_end].is_empty() {
        return Err(missing_provider(dsn));
    }

    // An authority holding only userinfo or a port still has no provider
    let url = Url::parse(dsn).map_err(|e| match e {
        url::ParseError::EmptyHost => missing_provider(dsn),
        e => invalid(format!("Malformed DSN \"{dsn}\": {e}")),
    })?;
    let provider = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| missing_provider(dsn))?;

    // Later duplicates overwrite earlier ones
    let parameters: BTreeMap<String, String> = url.query_pairs().into_owned().collect();

    ConnectionDescriptor::new(provider, parameters)
}

fn validate(descriptor: &ConnectionDescriptor) -> Result<()> {
    let provider = descriptor.provider().parse::<Provider>().map_err(|_| {
        invalid(format!(
            "Unknown provider: \"{}\". Supported providers: {}",
            descriptor.provider(),
            Provider::supported()
        ))
    })?;

    match provider {
        Provider::Http => {
            let endpoint = required(descriptor, params::ENDPOINT, provider)?;
            parse_endpoint(endpoint)?;
        }
        Provider::InCluster => {
            if !descriptor.parameters().is_empty() {
                return Err(invalid(
                    "The in-cluster provider does not accept any parameters".to_string(),
                ));
            }
        }
        Provider::KubeConfig => {
            required(descriptor, params::PATH, provider)?;
        }
    }

    Ok(())
}

fn required<'a>(
    descriptor: &'a ConnectionDescriptor,
    key: &str,
    provider: Provider,
) -> Result<&'a str> {
    match descriptor.get_parameter(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(invalid(format!(
            "Missing required parameter \"{key}\" for {provider} provider"
        ))),
    }
}
