/// Snapshot export and import
///
/// - Codec between the stored content graph and the JSON snapshot document
/// - Transactional wipe-and-replace import with section id remapping

pub mod codec;
pub mod import;

pub use codec::{ImportPlan, SectionSpec, SnapshotCodec, SnapshotDocument};
pub use import::{ImportReport, ImportTransaction};
