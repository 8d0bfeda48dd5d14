pub mod price;
pub mod quote;
pub mod symbol;
