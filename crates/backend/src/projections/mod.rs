pub mod p601_payroll_ledger;
