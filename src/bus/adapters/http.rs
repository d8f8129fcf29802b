//! HTTP transport carrying envelopes to remote peers as JSON-RPC requests.

use crate::bus::adapters::memory::InProcessBus;
use crate::bus::message::{Envelope, Topic, WireMessage};
use crate::bus::ports::{BusError, BusResult, MessageBus, MessageHandler, Subscription};
use crate::config::BusConfig;
use crate::notification::CoreEvent;
use crate::rpc::protocol::{JsonRpcRequest, JsonRpcResponse};
use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How a published envelope is routed to peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Direct request/response with the first configured peer.
    Direct,
    /// Group fan-out to every configured peer.
    Group,
}

/// Transport that delivers envelopes to remote peers over HTTP JSON-RPC.
///
/// Local subscribers are served by an inner in-process bus, so consumers on
/// the same node still receive every published envelope. Remote delivery runs
/// on a detached task: `publish` returns as soon as local fan-out completes,
/// and the envelope's `message_id` keeps the deferred retries idempotent on
/// the receiving side. A delivery that exhausts its bounded retries is logged
/// and absorbed as a [`CoreEvent::TransportDegraded`] event; it never fails
/// or stalls the publisher.
pub struct HttpTransport<C> {
    peers: Vec<String>,
    mode: DeliveryMode,
    local: InProcessBus,
    link: Arc<RemoteLink<C>>,
}

/// Client state shared with the detached delivery tasks.
struct RemoteLink<C> {
    client: reqwest::Client,
    shared_secret: Option<String>,
    retry_max_attempts: u32,
    retry_backoff: Duration,
    local: InProcessBus,
    clock: Arc<C>,
}

impl<C> HttpTransport<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Builds a transport from the bus configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Handler`] when the HTTP client cannot be built.
    pub fn new(config: &BusConfig, mode: DeliveryMode, clock: Arc<C>) -> BusResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.tls_insecure)
            .build()
            .map_err(|err| BusError::Handler(err.to_string()))?;
        let local = InProcessBus::new();
        Ok(Self {
            peers: config.peers.clone(),
            mode,
            local: local.clone(),
            link: Arc::new(RemoteLink {
                client,
                shared_secret: config.shared_secret.clone(),
                retry_max_attempts: config.retry_max_attempts.max(1),
                retry_backoff: config.retry_backoff,
                local,
                clock,
            }),
        })
    }

    /// Returns a bus view that delivers only to this node's subscribers.
    ///
    /// Hand this to the RPC dispatcher so envelopes received from peers are
    /// fanned out locally without being re-broadcast to the network.
    #[must_use]
    pub fn inbound_view(&self) -> InProcessBus {
        self.local.clone()
    }

    /// Returns the peers the configured delivery mode addresses.
    pub(crate) fn targets(&self) -> &[String] {
        match self.mode {
            DeliveryMode::Direct => self.peers.first().map(std::slice::from_ref).unwrap_or(&[]),
            DeliveryMode::Group => &self.peers,
        }
    }
}

impl<C> RemoteLink<C>
where
    C: Clock + Send + Sync,
{
    async fn deliver(&self, peers: &[String], topic: Topic, envelope: &Envelope) {
        for peer in peers {
            if let Err(err) = self.send_with_retry(peer, topic, envelope).await {
                self.report_degraded(peer, topic, &err).await;
            }
        }
    }

    async fn send_with_retry(&self, peer: &str, topic: Topic, envelope: &Envelope) -> BusResult<()> {
        let params = json!({ "topic": topic.as_str(), "envelope": envelope });
        let request = JsonRpcRequest::new(
            json!(envelope.message_id().to_string()),
            "message/send",
            params,
        );
        let mut backoff = self.retry_backoff;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.send_once(peer, &request).await {
                Ok(()) => {
                    debug!(peer, topic = topic.as_str(), attempt, "envelope delivered");
                    return Ok(());
                }
                Err(err) if attempt < self.retry_max_attempts => {
                    warn!(peer, topic = topic.as_str(), attempt, error = %err, "delivery failed; retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Absorbs an abandoned remote delivery as a degradation event.
    async fn report_degraded(&self, peer: &str, topic: Topic, error: &BusError) {
        warn!(
            peer,
            topic = topic.as_str(),
            attempts = self.retry_max_attempts,
            error = %error,
            "delivery abandoned after bounded retries"
        );
        let event = CoreEvent::TransportDegraded {
            detail: format!("delivery to {peer} on {topic} failed: {error}"),
        };
        let degraded = Envelope::new(WireMessage::TaskStatus { event }, self.clock.as_ref());
        if let Err(local_err) = self.local.publish(Topic::TaskState, degraded).await {
            warn!(error = %local_err, "degradation event lost to local subscribers");
        }
    }

    async fn send_once(&self, peer: &str, request: &JsonRpcRequest) -> BusResult<()> {
        let mut builder = self.client.post(peer).json(request);
        if let Some(secret) = &self.shared_secret {
            builder = builder.bearer_auth(secret);
        }
        let response = builder
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| BusError::Handler(err.to_string()))?;
        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|err| BusError::Serialization(err.to_string()))?;
        if let Some(error) = body.error {
            return Err(BusError::Handler(format!(
                "peer rejected envelope: {} ({})",
                error.message, error.code
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<C> MessageBus for HttpTransport<C>
where
    C: Clock + Send + Sync + 'static,
{
    async fn publish(&self, topic: Topic, envelope: Envelope) -> BusResult<()> {
        self.local.publish(topic, envelope.clone()).await?;
        let targets = self.targets();
        if targets.is_empty() {
            warn!(topic = topic.as_str(), "no peers configured; remote delivery skipped");
            return Ok(());
        }
        let peers = targets.to_vec();
        let link = Arc::clone(&self.link);
        tokio::spawn(async move {
            link.deliver(&peers, topic, &envelope).await;
        });
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: Topic,
        handler: Arc<dyn MessageHandler>,
    ) -> BusResult<Subscription> {
        self.local.subscribe(topic, handler).await
    }

    async fn unsubscribe(&self, subscription: &Subscription) -> BusResult<()> {
        self.local.unsubscribe(subscription).await
    }
}

impl<C> std::fmt::Debug for HttpTransport<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("peers", &self.peers)
            .field("mode", &self.mode)
            .field("retry_max_attempts", &self.link.retry_max_attempts)
            .finish_non_exhaustive()
    }
}
