pub mod delivery_attempts;
pub mod mailing_job_recipients;
pub mod mailing_jobs;
pub mod message_templates;
pub mod recipients;
