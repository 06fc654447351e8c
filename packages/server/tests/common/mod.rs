// Common test utilities

pub mod fixtures;
pub mod harness;
pub mod lockstep;

#[allow(unused_imports)]
pub use fixtures::*;
pub use harness::*;
#[allow(unused_imports)]
pub use lockstep::LockstepStore;
