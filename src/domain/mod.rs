pub mod entities;
pub mod naming;
pub mod use_cases;
