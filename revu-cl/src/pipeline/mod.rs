//! Batch review-classification pipeline
//!
//! One `POST /analyze` body travels: input validation → bounded fan-out of
//! one completion call per review → loose JSON extraction from each
//! completion → assembly of the `{predictions, warnings}` payload.
//!
//! Every expected operational failure (bad input, upstream call failure,
//! unparsable completion) terminates inside the pipeline and is reported
//! as data; the pipeline itself has a single success path.

pub mod classifier;
pub mod input;
pub mod output;
pub mod response;

pub use classifier::{BatchClassifier, RawModelResult, TaskOutcome, DEFAULT_MAX_CONCURRENCY};
pub use input::ValidationError;
pub use output::{BatchOutcome, Prediction};
pub use response::ParseError;
