mod session;

pub use session::MapSession;
