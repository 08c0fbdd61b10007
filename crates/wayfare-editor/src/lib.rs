//! Wayfare Editor — the multi-step experience draft editor.
//!
//! `DraftState` holds the in-memory draft and gates every mutation through
//! the status policy; `StepFormEngine` drives the five-step wizard over it.
//! Category defaulting lives in its own module as a pure function.

pub mod category;
pub mod draft;
pub mod steps;

pub use draft::{DraftState, FieldPatch, ListField, SeedState};
pub use steps::{AdvanceError, Step, StepFormEngine, StepValidator};
