//! # propgen-emit
//!
//! **Tier 3 (Emission)**
//!
//! Composes resolver and selector output into `GeneratedTestUnit`s and
//! renders them as Hypothesis test modules.
//!
//! Rendering is a pure function of the units and settings: no timestamps,
//! no hash-ordered iteration, so identical input produces byte-identical
//! modules. Placeholders are never dropped; they render as a marker comment
//! plus `st.from_type(object)` so the module still parses.
//!
//! ## What belongs here
//! * Unit composition and validation of signatures
//! * Test naming and collision handling
//! * Python source rendering
//!
//! ## What does NOT belong here
//! * Writing files (see propgen-core)
//! * Parallel scheduling (see propgen-core)

pub mod module;
pub mod naming;
pub mod render;
pub mod unit;

pub use module::{emit, output_file_for, render_module, render_unit};
pub use naming::{assign_test_names, module_path};
pub use unit::{Composition, compose, failed_unit};
