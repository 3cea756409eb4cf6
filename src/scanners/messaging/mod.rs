//! Messaging scanners (§6 group `messaging`): producer/consumer
//! relationships across queue and stream-processing frameworks, paired
//! into `relation` edges by channel name during merge (§4.4).

mod celery_tasks;
mod dotnet_kafka;
mod dotnet_kafka_streams;
mod faust_streams;
mod kafka_consumer;
mod kafka_streams;
mod rabbitmq_listener;
mod sidekiq_workers;
mod util;

use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![
        kafka_consumer::DESCRIPTOR,
        kafka_streams::DESCRIPTOR,
        rabbitmq_listener::DESCRIPTOR,
        dotnet_kafka::DESCRIPTOR,
        dotnet_kafka_streams::DESCRIPTOR,
        celery_tasks::DESCRIPTOR,
        faust_streams::DESCRIPTOR,
        sidekiq_workers::DESCRIPTOR,
    ]
}
