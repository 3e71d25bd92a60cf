pub mod colors;
pub mod convert;
pub mod feature;
pub mod geo;
pub mod output;
pub mod record;
