//! Ruby scanners (§6 group `ruby`).

mod bundler_dependencies;
mod rails_api;
mod rails_routes;

use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![bundler_dependencies::DESCRIPTOR, rails_api::DESCRIPTOR, rails_routes::DESCRIPTOR]
}
