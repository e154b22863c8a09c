//! tascal-gen - lowers an annotated [`Program`] to MEPA instruction text.
//!
//! A straight traversal of the tree the parser already fully annotated:
//! no further analysis happens here, only emission. Reachable only once
//! the compiler's diagnostics are empty, but the generator itself never
//! checks that — it's the driver's job to skip the call.

mod generator;

pub use generator::Generator;
