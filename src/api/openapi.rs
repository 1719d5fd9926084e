//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the media-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the media-dl REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-dl REST API",
        version = "0.1.0",
        description = "Queue media URLs for download through yt-dlp and poll their progress",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Jobs
        crate::api::routes::submit_download,
        crate::api::routes::list_status,
        crate::api::routes::get_status,
        crate::api::routes::list_resolutions,
        crate::api::routes::status_page,

        // Maintenance
        crate::api::routes::clear_history,
        crate::api::routes::purge_files,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::JobRecord,
        crate::types::Phase,
        crate::types::Resolution,
        crate::types::ResolutionOptions,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::ToolsConfig,
        crate::config::PersistenceConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // API request/response types
        crate::api::routes::DownloadRequest,
        crate::api::routes::DownloadAccepted,
        crate::api::routes::ClearHistoryResponse,
        crate::api::routes::PurgeResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "jobs", description = "Submit URLs and poll job status"),
        (name = "history", description = "Job history maintenance"),
        (name = "files", description = "Download directory maintenance"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_has_every_route() {
        let spec = ApiDoc::openapi();

        for path in [
            "/download",
            "/status",
            "/status/{id}",
            "/resolutions",
            "/statusPage",
            "/history",
            "/purge",
            "/health",
            "/openapi.json",
            "/events",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn test_openapi_spec_has_components() {
        let spec = ApiDoc::openapi();
        let components = spec.components.unwrap();

        assert!(components.schemas.contains_key("JobRecord"));
        assert!(components.schemas.contains_key("DownloadAccepted"));
        assert!(components.schemas.contains_key("ApiError"));
    }

    #[test]
    fn test_openapi_spec_has_tags() {
        let spec = ApiDoc::openapi();
        let tags = spec.tags.unwrap();

        let tag_names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["jobs", "history", "files", "system"]);
    }

    #[test]
    fn test_openapi_spec_info() {
        let spec = ApiDoc::openapi();

        assert_eq!(spec.info.title, "media-dl REST API");
        assert!(spec.info.description.is_some());
    }
}
