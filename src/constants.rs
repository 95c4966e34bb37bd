// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Literal prefix every connection string must start with
pub const SCHEME: &str = "kube://";

/// Provider identifiers accepted in the DSN authority segment
pub mod providers {
    pub const HTTP: &str = "http";
    pub const IN_CLUSTER: &str = "in-cluster";
    pub const KUBECONFIG: &str = "kubeconfig";
}

/// Query parameters understood by the providers
pub mod params {
    /// API server URL (http provider, required)
    pub const ENDPOINT: &str = "endpoint";
    /// Bearer token, inline or a path to a token file (http provider)
    pub const TOKEN: &str = "token";
    /// CA bundle path (http provider)
    pub const CA: &str = "ca";
    /// Client certificate path (http provider)
    pub const CERT: &str = "cert";
    /// Client private key path (http provider)
    pub const KEY: &str = "key";
    pub const HTTP_USER: &str = "http_user";
    pub const HTTP_PASSWORD: &str = "http_password";
    /// Kubeconfig file path (kubeconfig provider, required)
    pub const PATH: &str = "path";
    /// Kubeconfig context name (kubeconfig provider)
    pub const CONTEXT: &str = "context";
}

/// Environment variables read by [`crate::config::Config::from_env`]
pub mod env {
    pub const CONFIG_FILE: &str = "KUBE_DSN_CONFIG";
    pub const DSN: &str = "KUBE_DSN";
    pub const DEFAULT_CLIENT: &str = "KUBE_DSN_DEFAULT_CLIENT";
}

/// Client name used when no explicit default is configured
pub const DEFAULT_CLIENT_NAME: &str = "default";
