pub mod use_app_context;
pub mod use_calendar;
pub mod use_payables;
pub mod use_reference_data;
