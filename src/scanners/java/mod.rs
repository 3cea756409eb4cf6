//! Java/JVM scanners (§6 group `java`).

mod gradle_dependencies;
mod java_grpc_service;
mod java_http_client;
mod jaxrs_api;
mod jpa_entities;
mod maven_dependencies;
mod mongodb_repository;
mod spring_component;
mod spring_rest_api;

use crate::ast::Decorator;
use crate::ast::extract_named_argument;
use crate::ast::extract_positional;
use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![
        maven_dependencies::DESCRIPTOR,
        gradle_dependencies::DESCRIPTOR,
        spring_component::DESCRIPTOR,
        spring_rest_api::DESCRIPTOR,
        jaxrs_api::DESCRIPTOR,
        jpa_entities::DESCRIPTOR,
        mongodb_repository::DESCRIPTOR,
        java_http_client::DESCRIPTOR,
        java_grpc_service::DESCRIPTOR,
    ]
}

/// Extract a route/path literal from an annotation's raw argument text:
/// either the first positional value (`@GetMapping("/x")`) or a
/// `value`/`path` keyword argument (`@RequestMapping(value = "/x")`).
pub(super) fn annotation_path(decorator: &Decorator) -> Option<String> {
    extract_positional(&decorator.arguments, 0)
        .or_else(|| extract_named_argument(&decorator.arguments, "value"))
        .or_else(|| extract_named_argument(&decorator.arguments, "path"))
}

pub(super) fn join_paths(base: &str, rest: &str) -> String {
    let base = base.trim_end_matches('/');
    let rest = rest.trim_start_matches('/');
    if base.is_empty() && rest.is_empty() {
        "/".to_string()
    } else if rest.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        format!("/{rest}")
    } else {
        format!("{base}/{rest}")
    }
}
