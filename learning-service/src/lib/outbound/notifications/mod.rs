pub mod log;
pub mod messages;
pub mod producer;

pub use log::LogNotifier;
pub use producer::KafkaNotificationProducer;
