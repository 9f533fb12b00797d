use crate::application::comment_service::CommentService;
use crate::data::comment_repository::PostgresCommentRepository;
use crate::data::post_repository::PostgresPostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CommentRequest, PageableRequest};
use crate::presentation::handlers::request_id;
use actix_web::{HttpRequest, HttpResponse, delete, post, put, web};
use tracing::info;

type Service = web::Data<CommentService<PostgresCommentRepository, PostgresPostRepository>>;

#[post("/post/{post_id}/comment")]
pub async fn create(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let comment = service.create(post_id, payload.into_inner()).await?;

    info!(
        request_id = %request_id(&req),
        comment_id = comment.id,
        post_id,
        "comment saved"
    );

    Ok(HttpResponse::Ok().finish())
}

#[delete("/comment/{comment_id}")]
pub async fn delete_by_id(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    service.delete(comment_id).await?;

    info!(request_id = %request_id(&req), comment_id, "comment delete requested");

    Ok(HttpResponse::Ok().finish())
}

#[put("/comment/{comment_id}/displayed")]
pub async fn change_displayed(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let comment_id = path.into_inner();
    service.change_displayed(comment_id).await?;

    info!(request_id = %request_id(&req), comment_id, "comment visibility toggled");

    Ok(HttpResponse::Ok().finish())
}

#[post("/post/{post_id}/comment/displayed")]
pub async fn displayed(
    service: Service,
    path: web::Path<i64>,
    payload: web::Json<PageableRequest>,
) -> Result<HttpResponse, DomainError> {
    let comments = service
        .get_displayed(path.into_inner(), &payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[put("/comment/{comment_id}/like")]
pub async fn like(service: Service, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    service.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[put("/comment/{comment_id}/dislike")]
pub async fn dislike(service: Service, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    service.dislike(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
