pub mod archive;
pub mod constants;
pub mod error;
pub mod grid;
pub mod knots;
pub mod pipeline;
pub mod resample;
pub mod spline;
pub mod timeslice;

pub use archive::{SignalSource, Snapshot};
pub use error::{FitError, InputError, Result};
pub use grid::{EvaluationGrid, GridPolicy};
pub use knots::KnotSet;
pub use pipeline::{FitOptions, FitResult, ProfileComparison, fit_knots, fit_profile};
pub use resample::{ReduceParams, TrailingKnot, reduce};
pub use spline::{EndCondition, NaturalSpline, Segment, SplineOptions, TailSegment, evaluate};
pub use timeslice::{ChannelNames, Timeslice, knots_at, online_profile_at};
pub use pcsfit_data;
