//! Authentication: session token issuance/validation and the
//! register/login service.

pub mod password;
pub mod service;
pub mod token;

pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::TokenService;
