// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Credential strategies, client factories and the transport/codec seams they use.

pub mod builder;
pub mod client;
pub mod codec;
pub mod strategy;
pub mod transport;

pub use builder::{build, build_from_descriptor, build_strategy};
pub use client::{Client, ClientFactory};
pub use codec::{Codec, JsonCodec, YamlCodec};
pub use strategy::{CredentialStrategy, DirectEndpoint};
pub use transport::{HyperTransport, Transport};
