pub mod day_summary_modal;
pub mod filter_bar;
pub mod header;
pub mod login_prompt;
pub mod partial_payment_form;
pub mod payable_calendar;
pub mod payable_form;
pub mod payables_page;
pub mod payables_table;
pub mod totals_bar;

pub use header::Header;
pub use login_prompt::LoginPrompt;
pub use payables_page::PayablesPage;
