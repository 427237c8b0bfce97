pub mod error;
pub mod instance;
pub mod resource_profile;
pub mod schedulers;
pub mod solution;
pub mod validator;

pub use error::{IndexKind, InstanceError, RangeError};
pub use instance::Instance;
pub use resource_profile::ResourceProfile;
pub use solution::Solution;
pub use validator::{FeasibilityReport, Violation};
