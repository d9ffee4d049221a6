//! Fast integration tests
//!
//! These exercise model construction, fitting, prediction and adaptation on
//! small one- and two-dimensional problems with reduced restart counts.

#[path = "unit/helpers.rs"]
mod helpers;
#[path = "unit/config_validation.rs"]
mod config_validation;
#[path = "unit/end_to_end.rs"]
mod end_to_end;
#[path = "unit/bounds.rs"]
mod bounds;
#[path = "unit/low_fidelity.rs"]
mod low_fidelity;
#[path = "unit/assessment.rs"]
mod assessment;
