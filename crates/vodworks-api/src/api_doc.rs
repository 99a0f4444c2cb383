//! OpenAPI documentation

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "vodworks",
        description = "HLS conversion worker: upload a video, get back a master playlist URL"
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::convert::convert_video,
    ),
    components(schemas(
        crate::handlers::health::HealthResponse,
        crate::handlers::convert::ConvertResponse,
        crate::error::ErrorResponse,
    ))
)]
pub struct ApiDoc;
