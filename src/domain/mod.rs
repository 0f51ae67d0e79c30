pub mod prediction;
pub mod record;
pub mod summary;
pub mod zodiac;
