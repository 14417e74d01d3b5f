pub mod payable;

pub use payable::Payable;
