pub mod hash;
pub mod path;
pub mod random;
pub mod time;
