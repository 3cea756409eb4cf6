//! Schema and IDL scanners (§6 group `schema`): standalone schema
//! documents and the cross-references between them and REST/event
//! operations, rather than a single host language's AST.

mod avro_schema;
mod graphql_schema;
mod protobuf_schema;
mod rest_event_flow;
mod sql_migrations;

use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![
        graphql_schema::DESCRIPTOR,
        avro_schema::DESCRIPTOR,
        protobuf_schema::DESCRIPTOR,
        sql_migrations::DESCRIPTOR,
        rest_event_flow::DESCRIPTOR,
    ]
}
