//! Scanner implementations and the registry/group machinery that selects
//! and dispatches them (§4.2, §4.3, §6).

pub mod dotnet;
pub mod go;
pub mod groups;
pub mod java;
pub mod javascript;
pub mod messaging;
pub mod python;
pub mod registry;
pub mod ruby;
pub mod schema;
pub mod util;

pub use registry::{get_registry, ScanFn, ScannerAst, ScannerDescriptor, ScannerRegistry};

use crate::model::Confidence;
use crate::parsing::ParseConfidence;

/// A scanner's finding confidence mirrors the parse strategy that
/// produced its AST (§4.3); text-only scanners over `other` files have no
/// fallback to degrade from, so they always report `High`.
pub fn confidence_of(parse: ParseConfidence) -> Confidence {
    match parse {
        ParseConfidence::High => Confidence::High,
        ParseConfidence::Low => Confidence::Low,
    }
}

/// Every scanner descriptor, in the fixed registration order that
/// determines both dispatch order and merge tie-breaking (§9). Order
/// within and across families follows the closed-set group listing in
/// §6.
pub(crate) fn all_descriptors() -> Vec<ScannerDescriptor> {
    let mut all = Vec::with_capacity(42);
    all.extend(java::descriptors());
    all.extend(python::descriptors());
    all.extend(dotnet::descriptors());
    all.extend(go::descriptors());
    all.extend(ruby::descriptors());
    all.extend(javascript::descriptors());
    all.extend(messaging::descriptors());
    all.extend(schema::descriptors());
    all
}
