pub mod geo;
pub mod scheduler;
pub mod state;
pub mod time;
