//! File handlers: upload, delete and preview redirect.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use quill_core::BlogService;
use quill_core::domain::{FileId, FileUpload, Query, StoredFile, UserProfile};
use quill_shared::ApiResponse;
use quill_shared::dto::FileResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::gate::Protected;
use crate::state::AppState;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    pub name: String,
}

fn file_response(state: &AppState, file: StoredFile) -> AppResult<FileResponse> {
    Ok(FileResponse {
        preview_url: state.blog.file_preview(&file.id)?,
        id: file.id.to_string(),
        name: file.name,
        mime_type: file.mime_type,
        size: file.size,
        created_at: file.created_at.to_rfc3339(),
    })
}

/// Refuse when another user's post uses the file as its featured image.
async fn ensure_not_foreign(
    blog: &BlogService,
    file_id: &FileId,
    user: &UserProfile,
) -> AppResult<()> {
    let foreign = blog
        .get_posts(Some(vec![
            Query::equal("featuredImage", file_id.as_str()),
            Query::not_equal("userId", user.id.as_str()),
            Query::limit(1),
        ]))
        .await?;

    if foreign.total > 0 {
        tracing::warn!(
            file_id = %file_id,
            user_id = %user.id,
            "Refusing to delete another user's image"
        );
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// POST /files?name=... - the request body is the file.
pub async fn upload(
    _: Protected,
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let mime_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream");

    let file = state
        .blog
        .upload_file(FileUpload::new(
            params.into_inner().name,
            mime_type,
            body.to_vec(),
        ))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(file_response(&state, file)?)))
}

/// DELETE /files/{id}
pub async fn delete(
    Protected(user): Protected,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let file_id = FileId::parse(path.into_inner())?;
    ensure_not_foreign(&state.blog, &file_id, &user).await?;

    state.blog.delete_file(&file_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /files/{id}/preview - `307` to the storage preview.
pub async fn preview(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let file_id = FileId::parse(path.into_inner())?;
    let url = state.blog.file_preview(&file_id)?;

    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, url))
        .finish())
}
