mod jwt;
mod password;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod repositories;
pub mod routes;
pub mod services;

pub use jwt::JwtService;
pub use password::PasswordHasher;
