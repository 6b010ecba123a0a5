pub mod common;
pub mod u601_payroll_upload;
