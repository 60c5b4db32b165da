pub mod health;
pub mod login;
pub mod origin;
pub mod password;
pub mod session;
