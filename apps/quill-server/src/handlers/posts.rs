//! Post handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::BlogService;
use quill_core::domain::{
    FileId, NewPost, Post, PostList, PostPatch, PostStatus, Query, Slug, UserProfile,
};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, PostListResponse, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::gate::Protected;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

fn post_response(blog: &BlogService, post: Post) -> AppResult<PostResponse> {
    Ok(PostResponse {
        featured_image_url: post
            .featured_image
            .as_ref()
            .map(|id| blog.file_preview(id))
            .transpose()?,
        slug: post.slug.to_string(),
        title: post.title,
        content: post.content,
        featured_image: post.featured_image.map(|id| id.to_string()),
        status: post.status.to_string(),
        user_id: post.user_id,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    })
}

fn list_response(blog: &BlogService, list: PostList) -> AppResult<PostListResponse> {
    Ok(PostListResponse {
        total: list.total,
        posts: list
            .posts
            .into_iter()
            .map(|post| post_response(blog, post))
            .collect::<AppResult<_>>()?,
    })
}

/// Blank means no image.
fn image_id(value: Option<String>) -> AppResult<Option<FileId>> {
    Ok(value
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(FileId::parse)
        .transpose()?)
}

fn parse_status(value: Option<&str>) -> AppResult<Option<PostStatus>> {
    Ok(value.map(str::parse::<PostStatus>).transpose()?)
}

/// Load a post the signed-in user may modify.
async fn owned_post(blog: &BlogService, slug: &Slug, user: &UserProfile) -> AppResult<Post> {
    let post = blog
        .get_post(slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post not found: {slug}")))?;

    if !post.is_owned_by(&user.id) {
        tracing::warn!(slug = %slug, user_id = %user.id, "Refusing to modify another user's post");
        return Err(AppError::Forbidden);
    }
    Ok(post)
}

/// GET / - published posts.
pub async fn home(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let list = state.blog.get_posts(None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(list_response(&state.blog, list)?)))
}

/// GET /posts - every post, optionally narrowed by `?status=`.
pub async fn list(
    _: Protected,
    state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> AppResult<HttpResponse> {
    let queries = match parse_status(params.status.as_deref())? {
        Some(status) => vec![Query::equal("status", status.as_str())],
        None => Vec::new(),
    };

    let list = state.blog.get_posts(Some(queries)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(list_response(&state.blog, list)?)))
}

/// POST /posts
pub async fn create(
    Protected(user): Protected,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let slug = match req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => Slug::parse(slug)?,
        None => Slug::from_title(&req.title)?,
    };

    let post = state
        .blog
        .create_post(NewPost {
            slug,
            title: req.title,
            content: req.content,
            featured_image: image_id(req.featured_image)?,
            status: parse_status(req.status.as_deref())?.unwrap_or_default(),
            user_id: user.id,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        post_response(&state.blog, post)?,
        "Post created",
    )))
}

/// GET /posts/{slug}
pub async fn show(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let slug = Slug::parse(path.into_inner())?;
    let post = state
        .blog
        .get_post(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post not found: {slug}")))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&state.blog, post)?)))
}

/// PUT /posts/{slug}
pub async fn update(
    Protected(user): Protected,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let slug = Slug::parse(path.into_inner())?;
    owned_post(&state.blog, &slug, &user).await?;

    let req = body.into_inner();
    let post = state
        .blog
        .update_post(
            &slug,
            PostPatch {
                title: req.title,
                content: req.content,
                featured_image: image_id(req.featured_image)?,
                status: parse_status(req.status.as_deref())?,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&state.blog, post)?)))
}

/// DELETE /posts/{slug} - also removes the post's featured image.
pub async fn delete(
    Protected(user): Protected,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let slug = Slug::parse(path.into_inner())?;
    let post = owned_post(&state.blog, &slug, &user).await?;

    state.blog.delete_post(&slug).await?;

    if let Some(image) = post.featured_image {
        // The post is already deleted at this point; a failure here is only logged.
        if let Err(e) = state.blog.delete_file(&image).await {
            tracing::warn!(slug = %slug, file_id = %image, error = %e, "Featured image not deleted");
        }
    }

    Ok(HttpResponse::NoContent().finish())
}
