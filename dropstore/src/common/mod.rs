pub mod constants;
pub mod record;
