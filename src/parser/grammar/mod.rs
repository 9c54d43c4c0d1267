//! Grammar rules for the C# subset
//!
//! Each submodule extends [`Parser`](super::parser::Parser) with the rules
//! for one layer of the language:
//!
//! - `declarations` - compilation unit members, type bodies, parameters
//! - `statements` - blocks and embedded statements
//! - `expressions` - Pratt expression parser
//! - `types` - type references plus speculative type scanning

mod declarations;
mod expressions;
mod statements;
mod types;

#[cfg(test)]
mod tests;
