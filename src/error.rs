// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KubeDsnError {
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("File not found: \"{}\"", .0.display())]
    FileNotFound(PathBuf),

    #[error("Client \"{name}\" does not exist. Available clients: {}", .available.join(", "))]
    UnknownClient { name: String, available: Vec<String> },

    #[error("Unknown provider: \"{0}\"")]
    UnknownProvider(String),

    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(String),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Payload codec error: {0}")]
    Codec(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KubeDsnError>;
