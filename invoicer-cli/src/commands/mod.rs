pub mod check_config;
pub mod hash_password;
pub mod serve;
