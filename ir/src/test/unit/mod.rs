pub mod data;
pub mod extract;
pub mod printer;
