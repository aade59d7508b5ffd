pub mod campaign;
pub mod engagement;
pub mod recipient;

pub use campaign::Campaign;
pub use engagement::{EngagementEvent, EngagementKind, SubmissionRecord};
pub use recipient::Recipient;
