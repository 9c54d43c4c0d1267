#[path = "helpers/mod.rs"]
mod helpers;

#[path = "dom/mod.rs"]
mod dom;
