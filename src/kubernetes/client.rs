// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client factories and the clients they produce.

use crate::error::{KubeDsnError, Result};
use crate::kubernetes::codec::{Codec, JsonCodec};
use crate::kubernetes::strategy::CredentialStrategy;
use crate::kubernetes::transport::Transport;
use http::{header, Method, Request};
use k8s_openapi::NamespaceResourceScope;
use kube::{Api, Resource};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// A live Kubernetes API client plus the codec used for untyped payloads
pub struct Client {
    kube: kube::Client,
    codec: Arc<dyn Codec>,
}

impl Client {
    pub fn new(kube: kube::Client, codec: Arc<dyn Codec>) -> Self {
        Self { kube, codec }
    }

    pub fn kube(&self) -> &kube::Client {
        &self.kube
    }

    pub fn default_namespace(&self) -> &str {
        self.kube.default_namespace()
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    /// Cluster-wide handle for any resource kind
    pub fn api<K>(&self) -> Api<K>
    where
        K: Resource,
        K::DynamicType: Default,
    {
        Api::all(self.kube.clone())
    }

    pub fn namespaced_api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.kube.clone(), namespace)
    }

    pub fn default_namespaced_api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::default_namespaced(self.kube.clone())
    }

    /// Send an untyped request, encoding the body and decoding the response with the codec
    #[instrument(skip(self, body))]
    pub async fn request_value(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let payload = body
            .map(|b| self.codec.encode(b))
            .transpose()?
            .unwrap_or_default();

        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, self.codec.content_type())
            .body(payload)
            .map_err(|e| KubeDsnError::Codec(format!("Invalid request for {}: {}", path, e)))?;

        let text = self.kube.request_text(request).await?;
        self.codec.decode(text.as_bytes())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("default_namespace", &self.default_namespace())
            .field("codec", &self.codec)
            .finish()
    }
}

/// Produces one long-lived [`Client`] from a credential strategy.
///
/// The client is built on the first call to [`ClientFactory::client`]; concurrent
/// first callers wait on the same initialization and every caller gets the same
/// instance. A failed initialization is not cached.
pub struct ClientFactory {
    strategy: CredentialStrategy,
    transport: Arc<dyn Transport>,
    codec: Arc<dyn Codec>,
    client: OnceCell<Arc<Client>>,
}

impl ClientFactory {
    /// Without a codec, payloads are JSON.
    pub fn new(
        strategy: CredentialStrategy,
        transport: Arc<dyn Transport>,
        codec: Option<Arc<dyn Codec>>,
    ) -> Self {
        Self {
            strategy,
            transport,
            codec: codec.unwrap_or_else(|| Arc::new(JsonCodec)),
            client: OnceCell::new(),
        }
    }

    pub fn strategy(&self) -> &CredentialStrategy {
        &self.strategy
    }

    /// Whether the client has already been built
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    pub async fn client(&self) -> Result<Arc<Client>> {
        self.client.get_or_try_init(|| self.connect()).await.cloned()
    }

    async fn connect(&self) -> Result<Arc<Client>> {
        debug!("Resolving {} credentials", self.strategy.provider());
        let config = self.strategy.resolve().await?;

        info!(
            "Creating client for {} ({} provider)",
            config.cluster_url,
            self.strategy.provider()
        );
        let kube = self.transport.connect(config)?;

        Ok(Arc::new(Client::new(kube, self.codec.clone())))
    }
}

impl fmt::Debug for ClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientFactory")
            .field("strategy", &self.strategy)
            .field("transport", &self.transport)
            .field("codec", &self.codec)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::codec::YamlCodec;
    use crate::kubernetes::strategy::DirectEndpoint;
    use crate::test_utils::{namespace_json, not_found_json, MockService, MockTransport};
    use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
    use serde_json::json;
    use std::path::PathBuf;

    fn direct_strategy() -> CredentialStrategy {
        CredentialStrategy::DirectEndpoint(DirectEndpoint::new(
            "http://127.0.0.1:8001".parse().unwrap(),
        ))
    }

    fn factory_with(service: MockService) -> (ClientFactory, MockTransport) {
        let transport = MockTransport::new(service);
        let factory = ClientFactory::new(direct_strategy(), Arc::new(transport.clone()), None);
        (factory, transport)
    }

    #[tokio::test]
    async fn test_client_is_built_lazily_and_memoized() {
        let (factory, transport) = factory_with(MockService::new());
        assert!(!factory.is_initialized());
        assert_eq!(transport.connect_count(), 0);

        let first = factory.client().await.unwrap();
        let second = factory.client().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(factory.is_initialized());
        assert_eq!(transport.connect_count(), 1);
        assert_eq!(transport.cluster_urls(), vec!["http://127.0.0.1:8001/".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_builds_one_client() {
        let (factory, transport) = factory_with(MockService::new());
        let factory = Arc::new(factory);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let factory = factory.clone();
                tokio::spawn(async move { factory.client().await.unwrap() })
            })
            .collect();

        let mut clients = Vec::new();
        for handle in handles {
            clients.push(handle.await.unwrap());
        }

        assert_eq!(transport.connect_count(), 1);
        assert!(clients.iter().all(|c| Arc::ptr_eq(c, &clients[0])));
    }

    #[tokio::test]
    async fn test_failed_connect_is_not_cached() {
        let transport = MockTransport::new(MockService::new());
        let factory = ClientFactory::new(
            CredentialStrategy::KubeConfigFile {
                path: PathBuf::from("/definitely/not/here/kubeconfig"),
                context: None,
            },
            Arc::new(transport.clone()),
            None,
        );

        assert!(factory.client().await.is_err());
        assert!(factory.client().await.is_err());
        assert!(!factory.is_initialized());
        assert_eq!(transport.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_default_codec_is_json() {
        let (factory, _) = factory_with(MockService::new());

        let client = factory.client().await.unwrap();

        assert_eq!(client.codec().content_type(), "application/json");
    }

    #[tokio::test]
    async fn test_request_value_decodes_response() {
        let service = MockService::new().on_get("/api/v1/namespaces/apps", 200, &namespace_json("apps"));
        let (factory, _) = factory_with(service);
        let client = factory.client().await.unwrap();

        let value = client
            .request_value(Method::GET, "/api/v1/namespaces/apps", None)
            .await
            .unwrap();

        assert_eq!(value["metadata"]["name"], "apps");
    }

    #[tokio::test]
    async fn test_request_value_with_yaml_codec() {
        let service = MockService::new().on_post("/api/v1/namespaces", 201, &namespace_json("apps"));
        let transport = MockTransport::new(service);
        let factory = ClientFactory::new(
            direct_strategy(),
            Arc::new(transport),
            Some(Arc::new(YamlCodec)),
        );
        let client = factory.client().await.unwrap();

        let body = json!({"apiVersion": "v1", "kind": "Namespace", "metadata": {"name": "apps"}});
        let value = client
            .request_value(Method::POST, "/api/v1/namespaces", Some(&body))
            .await
            .unwrap();

        assert_eq!(value["kind"], "Namespace");
    }

    #[tokio::test]
    async fn test_request_value_not_found() {
        let service = MockService::new().on_get(
            "/api/v1/namespaces/missing",
            404,
            &not_found_json("namespaces", "missing"),
        );
        let (factory, _) = factory_with(service);
        let client = factory.client().await.unwrap();

        let err = client
            .request_value(Method::GET, "/api/v1/namespaces/missing", None)
            .await
            .unwrap_err();

        assert!(matches!(err, KubeDsnError::Kube(kube::Error::Api(resp)) if resp.code == 404));
    }

    #[tokio::test]
    async fn test_typed_api_handles() {
        let config_map = json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {"name": "settings", "namespace": "apps"},
            "data": {"mode": "fast"}
        })
        .to_string();
        let service = MockService::new()
            .on_get("/api/v1/namespaces/apps/configmaps/settings", 200, &config_map)
            .on_get("/api/v1/namespaces/apps", 200, &namespace_json("apps"));
        let (factory, _) = factory_with(service);
        let client = factory.client().await.unwrap();

        let namespace = client.api::<Namespace>().get("apps").await.unwrap();
        let settings = client
            .namespaced_api::<ConfigMap>("apps")
            .get("settings")
            .await
            .unwrap();

        assert_eq!(namespace.metadata.name.as_deref(), Some("apps"));
        assert_eq!(
            settings.data.unwrap().get("mode").map(String::as_str),
            Some("fast")
        );
        assert_eq!(client.default_namespace(), "default");
    }
}
