pub mod change_report;
