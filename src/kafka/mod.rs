pub mod admin;
pub mod publisher;
pub mod topics;

pub use admin::{AdminOps, ClusterAdmin, HealthStatus};
pub use publisher::{DeliveryHandle, DeliveryOutcome, KafkaPublisher};
pub use topics::{TopicSet, TopicSnapshot, TopicSpec};
