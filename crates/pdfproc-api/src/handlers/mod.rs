pub mod health;
pub mod page;
pub mod process;
pub mod results;
