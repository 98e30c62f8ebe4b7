pub mod health;
pub mod salary;
