pub mod api;
pub mod identity;
pub mod logger;
pub mod normalizer;
pub mod validator;
