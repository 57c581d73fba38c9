use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::SubmitQuizRequest,
};

#[post("/courses/{course_id}/scores")]
pub async fn submit_quiz_response(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let score = state
        .scoring_service
        .submit_quiz_response(&auth.0, &course_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(score))
}

#[get("/courses/{course_id}/modules/{module_id}/scores")]
pub async fn score_history(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (course_id, module_id) = path.into_inner();
    let history = state
        .scoring_service
        .score_history(&auth.0, &course_id, &module_id)
        .await?;
    Ok(HttpResponse::Ok().json(history))
}
