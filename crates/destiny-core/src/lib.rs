pub mod birth;
pub mod config;
pub mod error;
pub mod fortune;
pub mod io;
pub mod paths;
pub mod responses;
pub mod results;
pub mod ritual;
pub mod share;
pub mod sink;
pub mod wizard;

pub use error::{DestinyError, Result};
