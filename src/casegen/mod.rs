// src/casegen/mod.rs

//! The `casegen` module generates solver journal files, one per case, from a
//! template journal and a JSON table of case parameters.
//!
//! Used by the _frp_ binary option `--generate-cases`.

pub mod casegenerator;
