pub mod survey_get;
pub mod survey_respond;

// Re-export handler functions for use in routing
pub use survey_get::survey_get;
pub use survey_respond::survey_respond;
