//! `outpost-session`: turns an authenticated identity into an
//! [`outpost_access::AuthorizationContext`] and holds it for the session.

pub mod config;
pub mod directory;
pub mod resolver;
pub mod session;

pub use config::{ConfigError, RESOLUTION_MODE_VAR, ResolutionMode, ResolverConfig};
pub use directory::{
    AccessDirectory, AssignmentRow, DirectoryError, DirectoryFixture, FixtureIdentity,
    InMemoryDirectory, ProfileRow,
};
pub use resolver::{ContextResolver, ResolveError};
pub use session::{Completion, ResolutionTicket, Session, SessionError, SessionState};
