//! Elevated shell execution and the shell-backed capability providers.
//!
//! - [`executor`]: synchronous `su` execution and the [`ShellExecutor`] seam
//! - [`session`]: persistent shell fed by an ordered queue
//! - [`commands`]: command-line builders with input validation
//! - [`stack_list`]: `am stack list` parser
//! - [`tasks`], [`poller`]: [`TaskBackend`](crate::platform::backend::TaskBackend)
//!   over `am`, with task events derived from polling
//! - [`input`]: [`InputRouter`](crate::input::InputRouter) over `input`

pub mod binary;
pub mod commands;
pub mod executor;
pub mod input;
pub mod poller;
pub mod session;
pub mod stack_list;
pub mod tasks;

pub use binary::resolve_binary;
pub use executor::{CommandResult, RootShell, ShellExecutor};
pub use input::ShellInput;
pub use poller::{TaskPoller, diff_snapshots};
pub use session::ShellSession;
pub use stack_list::{StackEntry, parse_stacks, parse_tasks};
pub use tasks::ShellTaskBackend;
