pub mod company;
pub mod session;
