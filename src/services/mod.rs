pub mod course_service;
pub mod gate_service;
pub mod module_service;
pub mod principal_service;
pub mod scoring_service;

pub use course_service::CourseService;
pub use gate_service::AccessGate;
pub use module_service::ModuleService;
pub use principal_service::PrincipalService;
pub use scoring_service::{tally_score, ScoringService};
