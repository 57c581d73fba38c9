use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::response::PrincipalDto,
};

#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let principal = state.principal_service.resolve(&auth.0).await?;
    Ok(HttpResponse::Ok().json(PrincipalDto::from(&principal)))
}
