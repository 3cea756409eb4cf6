//! .NET scanners (§6 group `dotnet`).

mod aspnet_core_api;
mod dotnet_grpc_service;
mod dotnet_solution;
mod entity_framework;
mod nuget_dependencies;

use crate::ast::Decorator;
use crate::ast::extract_named_argument;
use crate::ast::extract_positional;
use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![
        nuget_dependencies::DESCRIPTOR,
        dotnet_solution::DESCRIPTOR,
        aspnet_core_api::DESCRIPTOR,
        entity_framework::DESCRIPTOR,
        dotnet_grpc_service::DESCRIPTOR,
    ]
}

/// Extract a route literal from an ASP.NET attribute's raw argument text:
/// either the first positional value (`[HttpGet("{id}")]`) or a `Name`/
/// `Template` keyword argument (`[Route(Template = "x")]`).
pub(super) fn attribute_path(decorator: &Decorator) -> Option<String> {
    extract_positional(&decorator.arguments, 0).or_else(|| extract_named_argument(&decorator.arguments, "Template"))
}
