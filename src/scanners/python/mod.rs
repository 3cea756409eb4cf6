//! Python scanners (§6 group `python`).

mod django_app;
mod django_orm;
mod fastapi_endpoints;
mod flask_routes;
mod pip_poetry_dependencies;
mod sqlalchemy_models;

use crate::scanners::ScannerDescriptor;

pub fn descriptors() -> Vec<ScannerDescriptor> {
    vec![
        pip_poetry_dependencies::DESCRIPTOR,
        django_app::DESCRIPTOR,
        django_orm::DESCRIPTOR,
        fastapi_endpoints::DESCRIPTOR,
        flask_routes::DESCRIPTOR,
        sqlalchemy_models::DESCRIPTOR,
    ]
}
