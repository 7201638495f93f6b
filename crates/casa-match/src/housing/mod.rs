pub mod ami;
pub mod listings;
pub mod matching;
pub mod profile;
pub mod search;
