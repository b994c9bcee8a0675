pub mod manager;
pub mod models;
pub mod service;

pub use manager::DatabaseError;
pub use models::{Survey, SurveyResponse};
