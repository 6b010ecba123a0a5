pub mod a001_payroll_record;
