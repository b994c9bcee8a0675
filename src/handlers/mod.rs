// Public tier only: both survey endpoints are reachable without a token,
// the submission handler enforces authentication itself so it can report
// expired and invalid tokens distinctly.
pub mod public;
