// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth, role checks inside each handler)
pub mod protected; // /api/*
pub mod public; // /, /health
