// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Payload serializers used for untyped API requests.

use crate::error::{KubeDsnError, Result};
use serde_json::Value;
use std::fmt;

pub trait Codec: Send + Sync + fmt::Debug {
    /// Value sent as the request `Content-Type`
    fn content_type(&self) -> &'static str;

    fn encode(&self, value: &Value) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<Value>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| KubeDsnError::Codec(format!("JSON encode: {}", e)))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(|e| KubeDsnError::Codec(format!("JSON decode: {}", e)))
    }
}

/// YAML bodies; responses decode as well since JSON is valid YAML
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn content_type(&self) -> &'static str {
        "application/yaml"
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        serde_yaml::to_string(value)
            .map(String::into_bytes)
            .map_err(|e| KubeDsnError::Codec(format!("YAML encode: {}", e)))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        serde_yaml::from_slice(bytes).map_err(|e| KubeDsnError::Codec(format!("YAML decode: {}", e)))
    }
}
