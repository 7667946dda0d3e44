//! Fixtures shared by integration tests across the workspace.

mod backend;
mod env;

pub use backend::{RecordedRequest, StubBackend, refused_base_url};
pub use env::{EnvGuard, test_lock};
