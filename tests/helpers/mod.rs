pub mod dom_helpers;
pub mod source_fixtures;
