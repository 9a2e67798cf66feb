pub mod validate;
pub mod rules;
