//! Go scanners (§6 group `go`).

mod go_grpc_service;
mod go_http_router;
mod go_modules;
mod go_struct_orm;

use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![
        go_modules::DESCRIPTOR,
        go_http_router::DESCRIPTOR,
        go_struct_orm::DESCRIPTOR,
        go_grpc_service::DESCRIPTOR,
    ]
}
