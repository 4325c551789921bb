/// Application layer: use cases and the services they hand off to
pub mod services;
pub mod use_cases;
