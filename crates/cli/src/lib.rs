//! Developer tooling: inspect what an identity can see and do.

pub mod nav;
pub mod report;

pub use nav::{NavSection, sections, visible_sections};
pub use report::{ActionCheck, InspectReport, build_report};
