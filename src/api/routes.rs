//! actix-web handlers for the dashboard API.

use actix_web::{HttpResponse, web};

use crate::api::error::{ErrorBody, ServiceError};
use crate::api::service::{FilterQuery, QueryService};

/// Registers every `/api` route plus a JSON error handler for bad query strings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ServiceError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .route("/students", web::get().to(list_students))
            .route("/student/{id}", web::get().to(get_student))
            .route("/filter", web::get().to(filter_students))
            .route("/refresh", web::get().to(refresh))
            .route("/refresh", web::post().to(refresh))
            .route("/tasks", web::get().to(list_tasks))
            .route("/task-names", web::get().to(task_names)),
    );
}

/// Fallback for unknown paths.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody {
        error: "Endpoint not found".to_string(),
    })
}

async fn health(service: web::Data<QueryService>) -> HttpResponse {
    HttpResponse::Ok().json(service.health().await)
}

async fn list_students(service: web::Data<QueryService>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.list_all().await?))
}

async fn get_student(
    service: web::Data<QueryService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.get_by_id(&id).await?))
}

async fn filter_students(
    service: web::Data<QueryService>,
    query: web::Query<FilterQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(service.filter(&query).await)
}

async fn refresh(service: web::Data<QueryService>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.refresh().await?))
}

async fn list_tasks(service: web::Data<QueryService>) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.tasks().await?))
}

async fn task_names(service: web::Data<QueryService>) -> HttpResponse {
    HttpResponse::Ok().json(service.task_names())
}
