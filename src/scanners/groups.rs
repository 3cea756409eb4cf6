//! The scanner-group closed set (§6). Groups are pure macros: expanding
//! one yields a fixed, flat list of scanner IDs — no transitive
//! relationships between groups (§9 Open Question 2).

pub const JAVA: &[&str] = &[
    "maven-dependencies",
    "gradle-dependencies",
    "spring-component",
    "spring-rest-api",
    "jaxrs-api",
    "jpa-entities",
    "mongodb-repository",
    "java-http-client",
    "java-grpc-service",
];

pub const PYTHON: &[&str] = &[
    "pip-poetry-dependencies",
    "django-app",
    "django-orm",
    "fastapi-endpoints",
    "flask-routes",
    "sqlalchemy-models",
];

pub const DOTNET: &[&str] = &[
    "nuget-dependencies",
    "dotnet-solution",
    "aspnet-core-api",
    "entity-framework",
    "dotnet-grpc-service",
];

pub const GO: &[&str] = &["go-modules", "go-http-router", "go-struct-orm", "go-grpc-service"];

pub const RUBY: &[&str] = &["bundler-dependencies", "rails-api", "rails-routes"];

pub const JAVASCRIPT: &[&str] = &["npm-dependencies", "express-routes"];

pub const MESSAGING: &[&str] = &[
    "kafka-consumer",
    "kafka-streams",
    "rabbitmq-listener",
    "dotnet-kafka",
    "dotnet-kafka-streams",
    "celery-tasks",
    "faust-streams",
    "sidekiq-workers",
];

pub const SCHEMA: &[&str] = &[
    "graphql-schema",
    "avro-schema",
    "protobuf-schema",
    "sql-migrations",
    "rest-event-flow",
];

pub fn group_members(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "java" => Some(JAVA),
        "python" => Some(PYTHON),
        "dotnet" => Some(DOTNET),
        "go" => Some(GO),
        "ruby" => Some(RUBY),
        "javascript" => Some(JAVASCRIPT),
        "messaging" => Some(MESSAGING),
        "schema" => Some(SCHEMA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_group_name_in_the_closed_set_resolves() {
        for name in ["java", "python", "dotnet", "go", "ruby", "javascript", "messaging", "schema"] {
            assert!(group_members(name).is_some(), "missing group {name}");
        }
        assert!(group_members("not-a-group").is_none());
    }

    #[test]
    fn total_scanner_count_is_42() {
        let total = JAVA.len()
            + PYTHON.len()
            + DOTNET.len()
            + GO.len()
            + RUBY.len()
            + JAVASCRIPT.len()
            + MESSAGING.len()
            + SCHEMA.len();
        assert_eq!(total, 42);
    }
}
