// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod dsn;
pub mod error;
pub mod kubernetes;
pub mod registry;

#[cfg(test)]
pub mod test_utils;

pub use dsn::{parse, ConnectionDescriptor, Provider};
pub use error::{KubeDsnError, Result};
pub use kubernetes::{build, Client, ClientFactory, CredentialStrategy};
pub use registry::ClientRegistry;
