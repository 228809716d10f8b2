pub mod login;
pub mod pages;
pub mod payment;
