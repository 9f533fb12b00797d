use crate::application::post_service::PostService;
use crate::data::post_repository::PostgresPostRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{PageableRequest, PageableResponse, PostRequest, SearchRequest};
use crate::presentation::handlers::request_id;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;

type Service = web::Data<PostService<PostgresPostRepository>>;

#[get("/post")]
pub async fn list(service: Service) -> Result<HttpResponse, DomainError> {
    let posts = service.get_all_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[get("/post/{id}/info")]
pub async fn get_by_id(service: Service, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    let post = service.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("/post")]
pub async fn create(
    req: HttpRequest,
    service: Service,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, DomainError> {
    let saved = service.create_or_update(payload.into_inner()).await?;

    info!(request_id = %request_id(&req), post_id = saved.id, "post saved");

    Ok(HttpResponse::Ok().finish())
}

#[put("/post")]
pub async fn update(
    req: HttpRequest,
    service: Service,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, DomainError> {
    let saved = service.create_or_update(payload.into_inner()).await?;

    info!(request_id = %request_id(&req), post_id = saved.id, "post saved");

    Ok(HttpResponse::Ok().finish())
}

#[delete("/post/{id}")]
pub async fn delete_by_id(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.delete_post(id).await?;

    info!(request_id = %request_id(&req), post_id = id, "post delete requested");

    Ok(HttpResponse::Ok().finish())
}

#[get("/post/{author}")]
pub async fn get_by_author(
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.get_by_author(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[put("/post/{id}/displayed")]
pub async fn change_displayed(
    req: HttpRequest,
    service: Service,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.change_displayed(id).await?;

    info!(request_id = %request_id(&req), post_id = id, "post visibility toggled");

    Ok(HttpResponse::Ok().finish())
}

#[post("/post/displayed")]
pub async fn displayed(
    service: Service,
    payload: web::Json<PageableRequest>,
) -> Result<HttpResponse, DomainError> {
    let request = payload.into_inner();
    let page = service.get_displayed_posts(&request).await?;
    Ok(HttpResponse::Ok().json(PageableResponse::from_page(page, request.page)))
}

#[put("/post/{id}/like")]
pub async fn like(service: Service, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    service.like(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[put("/post/{id}/dislike")]
pub async fn dislike(service: Service, path: web::Path<i64>) -> Result<HttpResponse, DomainError> {
    service.dislike(path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

#[post("/post/popular")]
pub async fn popular(
    service: Service,
    payload: web::Json<PageableRequest>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.get_most_popular(&payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[post("/post/search")]
pub async fn search(
    service: Service,
    payload: web::Json<SearchRequest>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.search_by_content(&payload.content).await?;
    Ok(HttpResponse::Ok().json(posts))
}
