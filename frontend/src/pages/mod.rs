pub mod controls;
pub mod dashboard;
pub mod demo;
pub mod documents;
pub mod job_details;
pub mod login;
