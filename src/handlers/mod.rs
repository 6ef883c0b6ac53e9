// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth)
pub mod health;
pub mod protected; // JWT authentication required
pub mod public; // No authentication required
