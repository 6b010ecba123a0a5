pub mod u601_payroll_upload;
