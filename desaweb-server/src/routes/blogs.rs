//! Blog endpoints
//!
//! Create and delete go through [`BlogLifecycle`] so the image file and the
//! row are handled together; reads hit the repository directly.

use axum::{
    extract::{Multipart, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{Blog, BlogRepo};
use crate::error::ApiError;
use crate::lifecycle::{BlogLifecycle, NewBlogUpload, Upload};
use crate::state::AppState;

use super::common::SuccessResponse;

/// Create blog response
#[derive(Debug, Serialize)]
pub struct CreateBlogResponse {
    pub message: &'static str,
    pub id: i64,
}

/// Read the `title`, `description` and `image` parts of a blog form.
///
/// An `image` part with no file name or no content counts as absent.
/// Unknown parts are skipped.
pub async fn read_blog_form(mut multipart: Multipart) -> Result<NewBlogUpload, ApiError> {
    let mut title = None;
    let mut description = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "image" => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !original_name.is_empty() && !bytes.is_empty() {
                    image = Some(Upload {
                        original_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(NewBlogUpload {
        title: title.ok_or_else(|| ApiError::bad_request("missing field 'title'"))?,
        description: description
            .ok_or_else(|| ApiError::bad_request("missing field 'description'"))?,
        image,
    })
}

/// GET /api/blogs - newest first
async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<Blog>>, ApiError> {
    let blogs = BlogRepo::new(state.pool()).list().await?;
    Ok(Json(blogs))
}

/// GET /api/blogs/{id}
async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Blog>, ApiError> {
    let blog = BlogRepo::new(state.pool()).get(id).await?;
    Ok(Json(blog))
}

/// GET /api/blogs/title/{title} - first exact match
async fn get_blog_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Blog>, ApiError> {
    let blog = BlogRepo::new(state.pool()).get_by_title(&title).await?;
    Ok(Json(blog))
}

/// POST /api/blogs - multipart form with optional image
async fn create_blog(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CreateBlogResponse>, ApiError> {
    let upload = read_blog_form(multipart).await?;
    let id = BlogLifecycle::new(BlogRepo::new(state.pool()), state.assets())
        .create(upload)
        .await?;

    Ok(Json(CreateBlogResponse {
        message: "Blog added",
        id,
    }))
}

/// DELETE /api/blogs/{id} - row and image file
async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    BlogLifecycle::new(BlogRepo::new(state.pool()), state.assets())
        .delete(id)
        .await?;

    Ok(Json(SuccessResponse::new("Blog and image deleted")))
}

/// Blog routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route("/api/blogs/{id}", get(get_blog).delete(delete_blog))
        .route("/api/blogs/title/{title}", get(get_blog_by_title))
}

/// Build a `multipart/form-data` POST to `/api/blogs`.
///
/// Each part is `(name, file_name, content)`; a `None` file name makes a
/// plain text field.
#[cfg(test)]
pub(crate) fn multipart_request(
    parts: &[(&str, Option<&str>, &[u8])],
) -> axum::http::Request<axum::body::Body> {
    let boundary = "desaweb-test-boundary";
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match filename {
            Some(file) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    axum::http::Request::post("/api/blogs")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequest;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;

    async fn read(parts: &[(&str, Option<&str>, &[u8])]) -> Result<NewBlogUpload, ApiError> {
        let multipart = Multipart::from_request(multipart_request(parts), &())
            .await
            .unwrap();
        read_blog_form(multipart).await
    }

    #[tokio::test]
    async fn form_with_image() {
        let form = read(&[
            ("title", None, &b"Panen raya"[..]),
            ("description", None, &b"Hasil panen tahun ini"[..]),
            ("image", Some("panen.jpg"), &b"jpeg-bytes"[..]),
        ])
        .await
        .unwrap();

        assert_eq!(form.title, "Panen raya");
        assert_eq!(form.description, "Hasil panen tahun ini");
        let image = form.image.expect("image part should be kept");
        assert_eq!(image.original_name, "panen.jpg");
        assert_eq!(image.bytes, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn image_without_file_name_is_absent() {
        let form = read(&[
            ("title", None, &b"t"[..]),
            ("description", None, &b"d"[..]),
            ("image", Some(""), &b"jpeg-bytes"[..]),
        ])
        .await
        .unwrap();

        assert!(form.image.is_none());
    }

    #[tokio::test]
    async fn empty_image_is_absent() {
        let form = read(&[
            ("title", None, &b"t"[..]),
            ("description", None, &b"d"[..]),
            ("image", Some("empty.png"), &b""[..]),
        ])
        .await
        .unwrap();

        assert!(form.image.is_none());
    }

    #[tokio::test]
    async fn unknown_fields_are_skipped() {
        let form = read(&[
            ("title", None, &b"t"[..]),
            ("author", None, &b"someone"[..]),
            ("description", None, &b"d"[..]),
        ])
        .await
        .unwrap();

        assert_eq!(form.title, "t");
        assert!(form.image.is_none());
    }

    #[tokio::test]
    async fn missing_description_is_bad_request() {
        let err = read(&[("title", None, &b"t"[..])]).await.unwrap_err();

        assert!(matches!(err, ApiError::BadRequest { .. }));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
