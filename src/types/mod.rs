pub mod healthz;
pub mod password;
pub mod response;
pub mod token;
pub mod user;
