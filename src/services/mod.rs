pub mod auth;
pub mod gateway;
pub mod reservation_flow;
pub mod session;
pub mod validation;
