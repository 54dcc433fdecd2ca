pub mod client_meta;
pub mod jwt;
pub mod sanitize;
