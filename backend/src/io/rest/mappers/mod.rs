pub mod payable_mapper;

pub use payable_mapper::PayableMapper;
