// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here receives the caller as an `AuthUser` extension inserted
// by `jwt_auth_middleware`.
pub mod collaborations;
pub mod exports;
pub mod playlists;
