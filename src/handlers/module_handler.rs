use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{get, post, web, HttpResponse};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::{AppError, AppResult},
    models::dto::request::{CreateQuizModuleRequest, CreateVideoModuleRequest, VideoUpload},
};

const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

fn malformed(err: MultipartError) -> AppError {
    log::debug!("malformed multipart body: {}", err);
    AppError::bad_request()
}

fn upload_too_large() -> AppError {
    AppError::ValidationError("uploaded file too large".to_string())
}

/// Buffers a part up to `max_bytes`, failing with `too_large` past it.
async fn read_field(
    field: &mut Field,
    max_bytes: usize,
    too_large: fn() -> AppError,
) -> AppResult<Bytes> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(malformed)?;
        if buf.len() + chunk.len() > max_bytes {
            return Err(too_large());
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

async fn read_text(field: &mut Field) -> AppResult<String> {
    let bytes = read_field(field, MAX_TEXT_FIELD_BYTES, AppError::bad_request).await?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AppError::bad_request())
}

fn parse_flag(value: &str) -> AppResult<bool> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::bad_request()),
    }
}

/// Collects the `title`, `isPrivate` and `file` parts. Unknown parts are
/// drained and ignored.
async fn read_video_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> AppResult<CreateVideoModuleRequest> {
    let mut title = None;
    let mut is_private = None;
    let mut upload = None;

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(malformed)?;
        let name = field.name().unwrap_or_default().to_owned();

        match name.as_str() {
            "title" => title = Some(read_text(&mut field).await?),
            "isPrivate" => is_private = Some(parse_flag(&read_text(&mut field).await?)?),
            "file" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_owned();
                let content_type = field.content_type().map(|m| m.essence_str().to_owned());
                let bytes = read_field(&mut field, max_upload_bytes, upload_too_large).await?;
                upload = Some(VideoUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {
                read_field(&mut field, max_upload_bytes, upload_too_large).await?;
            }
        }
    }

    match (title, is_private, upload) {
        (Some(title), Some(is_private), Some(upload)) => Ok(CreateVideoModuleRequest {
            title,
            is_private,
            upload,
        }),
        _ => Err(AppError::bad_request()),
    }
}

#[post("/courses/{course_id}/modules/video")]
pub async fn create_video_module(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    payload: Multipart,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = read_video_form(payload, state.config.max_upload_bytes).await?;
    let module = state
        .module_service
        .create_video_module(&auth.0, &course_id, request)
        .await?;
    Ok(HttpResponse::Created().json(module))
}

#[post("/courses/{course_id}/modules/quiz")]
pub async fn create_quiz_module(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    request: web::Json<CreateQuizModuleRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let module = state
        .module_service
        .create_quiz_module(&auth.0, &course_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(module))
}

#[get("/courses/{course_id}/modules")]
pub async fn list_modules(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let modules = state.module_service.list_modules(&auth.0, &course_id).await?;
    Ok(HttpResponse::Ok().json(modules))
}

#[get("/courses/{course_id}/preview")]
pub async fn preview_modules(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let modules = state.module_service.preview_modules(&course_id).await?;
    Ok(HttpResponse::Ok().json(modules))
}
