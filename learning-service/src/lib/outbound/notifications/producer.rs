use async_trait::async_trait;
use chrono::Utc;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use thiserror::Error;

use crate::config::KafkaConfig;
use crate::domain::identity::notifications::Notification;
use crate::identity::errors::NotificationError;
use crate::identity::ports::Notifier;
use crate::outbound::notifications::messages::EmailRequestedMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for NotificationError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                NotificationError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => NotificationError::DeliveryFailed(msg),
        }
    }
}

/// Hands emails to the mail dispatcher through a Kafka topic.
///
/// `send` returns once the record is queued in the client. Broker
/// acknowledgement is awaited on a background task, so a slow or absent
/// broker never shows up in request latency.
pub struct KafkaNotificationProducer {
    producer: FutureProducer,
    topic: String,
}

impl KafkaNotificationProducer {
    /// Create a producer with at-least-once delivery.
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: No duplicates from producer retries
    /// - `message.timeout.ms=10000`: Give up on a delivery after 10s
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Initializing Kafka producer for notifications: brokers={}, topic={}",
            &config.brokers,
            &config.topic
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "10000")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "5")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            topic: config.topic.clone(),
        })
    }

    async fn publish(&self, message: &EmailRequestedMessage) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        // Keyed by recipient so one person's emails stay ordered.
        let record = FutureRecord::to(&self.topic)
            .key(&message.to)
            .payload(&payload);

        let delivery = self
            .producer
            .send_result(record)
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))?;

        let event_id = message.event_id.clone();
        let topic = self.topic.clone();
        tokio::spawn(async move {
            match delivery.await {
                Ok(Ok(_)) => {
                    tracing::debug!("Email request {} published to topic '{}'", event_id, topic);
                }
                Ok(Err((err, _))) => {
                    tracing::error!("Email request {} was not delivered: {}", event_id, err);
                }
                Err(_) => {
                    tracing::error!("Email request {} was dropped by the producer", event_id);
                }
            }
        });

        Ok(())
    }
}

#[async_trait]
impl Notifier for KafkaNotificationProducer {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let message = EmailRequestedMessage::new(notification, Utc::now());

        self.publish(&message).await.map_err(Into::into)
    }
}
