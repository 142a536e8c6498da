pub mod categories;
pub mod choices;
pub mod questions;
pub mod results;
pub mod sessions;
