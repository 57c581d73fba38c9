use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{CreateCourseRequest, UpdateDescriptionRequest},
};

#[post("/courses")]
pub async fn create_course(
    state: web::Data<AppState>,
    request: web::Json<CreateCourseRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .create_course(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(course))
}

#[get("/courses/{course_id}")]
pub async fn get_course(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state.course_service.get_course(&auth.0, &course_id).await?;
    Ok(HttpResponse::Ok().json(course))
}

#[put("/courses/{course_id}/description")]
pub async fn update_description(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    request: web::Json<UpdateDescriptionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .update_description(&auth.0, &course_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[put("/courses/{course_id}/publish")]
pub async fn publish_course(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let course = state
        .course_service
        .publish_course(&auth.0, &course_id)
        .await?;
    Ok(HttpResponse::Ok().json(course))
}

#[post("/courses/{course_id}/enroll")]
pub async fn enroll(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let enrollment = state.course_service.enroll(&auth.0, &course_id).await?;
    Ok(HttpResponse::Created().json(enrollment))
}
