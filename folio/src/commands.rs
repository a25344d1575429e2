pub mod email;
pub mod function;
pub mod serve;
