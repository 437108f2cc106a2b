// handlers/public/mod.rs - Public handlers (no session required)
//
// Route Prefix: none (/, /health)
// Middleware: none
pub mod health;
pub mod root;

pub use health::health;
pub use root::root;
