// Resume workflow: acquire a file, submit it for parsing, hand the parsed
// profile to match retrieval.
// All service calls go through api_client::JobAlignApi.

pub mod file_acquisition;
pub mod retrieval;
pub mod submission;
