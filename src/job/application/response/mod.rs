pub mod job_response;
