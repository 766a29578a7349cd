//! Nested-set tree core: interval maintenance, assembly, identity and locking

pub mod assembler;
pub mod guard;
pub mod identity;
pub mod interval;
pub mod service;

pub use assembler::{AssemblyMode, TreeAssembler, TreeNode};
pub use guard::{GuardState, MutationGuard};
pub use identity::IdentityResolver;
pub use interval::Interval;
pub use service::TreeService;
