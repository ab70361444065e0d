// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware inserts AuthUser; handlers check roles

pub mod conhecimento; // Knowledge base reads
pub mod documento; // Document ingestion
pub mod ia; // Grounded answers
