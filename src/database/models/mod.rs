pub mod playlist;
pub mod song;
pub mod user;

pub use playlist::{Playlist, PlaylistSummary};
pub use song::{Song, SongPayload, SongSummary};
pub use user::{User, UserPayload, UserProfile};
