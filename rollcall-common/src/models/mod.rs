pub mod batch;
pub mod member;
pub mod message;
