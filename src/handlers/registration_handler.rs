use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::Role,
        dto::{request::RegisterRequest, response::PrincipalDto},
    },
};

async fn register(
    state: &AppState,
    role: Role,
    request: RegisterRequest,
) -> Result<HttpResponse, AppError> {
    let principal = state.principal_service.register(role, request).await?;
    Ok(HttpResponse::Created().json(PrincipalDto::from(&principal)))
}

#[post("/register/instructor")]
pub async fn register_instructor(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register(&state, Role::Instructor, body.into_inner()).await
}

#[post("/register/student")]
pub async fn register_student(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    register(&state, Role::Student, body.into_inner()).await
}
