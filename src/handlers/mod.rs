pub mod course_handler;
pub mod health_handler;
pub mod module_handler;
pub mod principal_handler;
pub mod registration_handler;
pub mod score_handler;

use actix_web::web;

use crate::{auth::AuthMiddleware, errors::AppError};

pub use health_handler::health_check;

/// Mounts the public `/health` and `/register/*` routes and the
/// authenticated `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, req| {
        log::debug!("rejected JSON body on {}: {}", req.path(), err);
        AppError::bad_request().into()
    });
    let path_config = web::PathConfig::default().error_handler(|err, req| {
        log::debug!("rejected path {}: {}", req.path(), err);
        AppError::bad_request().into()
    });

    cfg.app_data(json_config)
        .app_data(path_config)
        .service(health_check)
        .service(registration_handler::register_instructor)
        .service(registration_handler::register_student)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(principal_handler::me)
                .service(course_handler::create_course)
                .service(course_handler::get_course)
                .service(course_handler::update_description)
                .service(course_handler::publish_course)
                .service(course_handler::enroll)
                .service(module_handler::create_video_module)
                .service(module_handler::create_quiz_module)
                .service(module_handler::list_modules)
                .service(module_handler::preview_modules)
                .service(score_handler::submit_quiz_response)
                .service(score_handler::score_history),
        );
}
