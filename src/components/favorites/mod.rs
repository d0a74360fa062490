pub mod models;
mod service;
mod session;
mod store;

pub use models::Favorite;
pub use service::FavoritesService;
pub use session::UserSession;
pub use store::{FavoritesStore, RedisFavoritesStore};
