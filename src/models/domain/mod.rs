pub mod course;
pub mod enrollment;
pub mod module;
pub mod principal;
pub mod quiz;
pub mod score;
pub use course::Course;
pub use enrollment::Enrollment;
pub use module::{Module, ModuleContent, ModuleType, Video};
pub use principal::{Instructor, Principal, Role, Student};
pub use quiz::{Question, Quiz, QuizOption};
pub use score::Score;
