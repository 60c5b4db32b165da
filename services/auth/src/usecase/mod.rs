pub mod account;
pub mod audit;
pub mod credential;
pub mod login;
pub mod otp;
pub mod risk_gate;
pub mod session;
