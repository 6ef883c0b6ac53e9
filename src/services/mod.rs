pub mod authentications_service;
pub mod collaborations_service;
pub mod error;
pub mod playlists_service;
pub mod producer_service;
pub mod songs_service;
pub mod storage_service;
pub mod users_service;

pub use authentications_service::AuthenticationsService;
pub use collaborations_service::CollaborationsService;
pub use error::ServiceError;
pub use playlists_service::{Ownership, PlaylistsService};
pub use producer_service::{ExportMessage, ExportProducer, RedisQueueProducer};
pub use songs_service::{SongFilter, SongLookup, SongsService};
pub use storage_service::LocalStorageService;
pub use users_service::UsersService;
