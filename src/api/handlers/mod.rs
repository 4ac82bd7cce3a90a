pub mod control;
pub mod gesture;
pub mod health;
pub mod text;
