//! JavaScript/TypeScript scanners (§6 group `javascript`).

mod express_routes;
mod npm_dependencies;

use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![npm_dependencies::DESCRIPTOR, express_routes::DESCRIPTOR]
}
