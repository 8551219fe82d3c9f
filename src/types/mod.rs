//! Public types exposed by the `kaisei-core` crate.

pub mod candidate;
pub mod record;
pub mod tags;

pub use candidate::RawCandidate;
pub use record::{
    ActionItem, ContentHash, CuratedRecord, ProcessStage, RecordId, SourceRef, Summary,
};
pub use tags::TagSet;
