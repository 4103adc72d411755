pub mod characters;
pub mod responses;
pub mod results;
pub mod rituals;
