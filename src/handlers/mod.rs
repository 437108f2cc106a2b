// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session required, /api/*)
pub mod protected; // Session required: notebooks, notes, sidebar, documents
pub mod public;    // No session: service info and health
