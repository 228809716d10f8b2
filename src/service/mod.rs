pub mod credentials;
pub mod font;
pub mod password;
pub mod pdf;
pub mod receipt;
