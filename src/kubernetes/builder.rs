// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Selects a credential strategy for a connection string and wraps it in a client factory.

use crate::constants::params;
use crate::dsn::{self, parse_endpoint, ConnectionDescriptor, Provider};
use crate::error::{KubeDsnError, Result};
use crate::kubernetes::client::ClientFactory;
use crate::kubernetes::codec::Codec;
use crate::kubernetes::strategy::{CredentialStrategy, DirectEndpoint};
use crate::kubernetes::transport::Transport;
use secrecy::SecretString;
use std::path::{self, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Build a client factory from a DSN such as `kube://http?endpoint=...`
pub fn build(
    dsn: &str,
    transport: Arc<dyn Transport>,
    codec: Option<Arc<dyn Codec>>,
) -> Result<ClientFactory> {
    let descriptor = dsn::parse(dsn)?;
    build_from_descriptor(&descriptor, transport, codec)
}

pub fn build_from_descriptor(
    descriptor: &ConnectionDescriptor,
    transport: Arc<dyn Transport>,
    codec: Option<Arc<dyn Codec>>,
) -> Result<ClientFactory> {
    let strategy = build_strategy(descriptor)?;
    debug!("Built {} client factory", strategy.provider());
    Ok(ClientFactory::new(strategy, transport, codec))
}

/// Map a descriptor onto its credential strategy.
///
/// The provider is checked again here so descriptors that never went through
/// the parser are still rejected.
pub fn build_strategy(descriptor: &ConnectionDescriptor) -> Result<CredentialStrategy> {
    match descriptor.provider().parse::<Provider>()? {
        Provider::Http => build_direct_endpoint(descriptor).map(CredentialStrategy::DirectEndpoint),
        Provider::InCluster => Ok(CredentialStrategy::InCluster),
        // The kubeconfig file is only read on first use
        Provider::KubeConfig => Ok(CredentialStrategy::KubeConfigFile {
            path: PathBuf::from(required(descriptor, params::PATH)?),
            context: descriptor.get_parameter(params::CONTEXT).map(str::to_string),
        }),
    }
}

fn build_direct_endpoint(descriptor: &ConnectionDescriptor) -> Result<DirectEndpoint> {
    let mut direct = DirectEndpoint::new(parse_endpoint(required(descriptor, params::ENDPOINT)?)?);

    direct.token = resolve_token(descriptor);
    direct.ca_file = resolve_file(descriptor, params::CA)?;
    direct.cert_file = resolve_file(descriptor, params::CERT)?;
    direct.key_file = resolve_file(descriptor, params::KEY)?;
    direct.basic_auth_user = descriptor.get_parameter(params::HTTP_USER).map(str::to_string);
    direct.basic_auth_password = secret(descriptor, params::HTTP_PASSWORD);

    Ok(direct)
}

fn required<'a>(descriptor: &'a ConnectionDescriptor, key: &str) -> Result<&'a str> {
    descriptor
        .get_parameter(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            KubeDsnError::InvalidConnectionString(format!(
                "Missing required parameter \"{key}\" for {} provider",
                descriptor.provider()
            ))
        })
}

fn secret(descriptor: &ConnectionDescriptor, key: &str) -> Option<SecretString> {
    descriptor
        .get_parameter(key)
        .map(|value| SecretString::from(value.to_string()))
}

/// The token as given, or its absolute path when it names an existing file
fn resolve_token(descriptor: &ConnectionDescriptor) -> Option<SecretString> {
    descriptor.get_parameter(params::TOKEN).map(|token| {
        let token = match path::absolute(token) {
            Ok(path) if path.is_file() => path.to_string_lossy().into_owned(),
            _ => token.to_string(),
        };
        SecretString::from(token)
    })
}

/// Absolute path of a referenced credential file, which must exist
fn resolve_file(descriptor: &ConnectionDescriptor, key: &str) -> Result<Option<PathBuf>> {
    let Some(raw) = descriptor.get_parameter(key) else {
        return Ok(None);
    };

    if raw.is_empty() {
        return Err(KubeDsnError::FileNotFound(PathBuf::from(raw)));
    }

    let path = path::absolute(raw).map_err(|e| {
        KubeDsnError::InvalidConnectionString(format!(
            "Invalid path for parameter \"{key}\": {e}"
        ))
    })?;

    if !path.exists() {
        return Err(KubeDsnError::FileNotFound(path));
    }

    Ok(Some(path))
}
