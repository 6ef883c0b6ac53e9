// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account registration, token acquisition, the song catalog and picture
// uploads.
pub mod authentications;
pub mod songs;
pub mod uploads;
pub mod users;
