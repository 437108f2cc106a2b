// handlers/protected/mod.rs - Protected handlers (session required)
//
// Route Prefix: /api/*
// Middleware: session_auth_middleware injects AuthUser; every store call is
// scoped to that user.
pub mod auth;
pub mod documents;
pub mod notebooks;
pub mod notes;
pub mod sidebar;
pub mod utils;
