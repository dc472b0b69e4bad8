pub mod core;
pub mod interfaces;
pub mod post;
pub mod pre;
