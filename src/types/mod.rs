pub mod coin;
pub mod price;
pub mod timestamp;
