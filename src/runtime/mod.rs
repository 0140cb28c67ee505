//! Runtime adapters and the thin collaborators around the engine: session
//! runner, console rendering and the interactive prompt.

pub mod prompt;
pub mod report;
pub mod session;
pub mod tokio_spawner;

pub use prompt::{prompt_config, Prompter};
pub use report::{banner, render_summary};
pub use session::{feed_roster, log_warnings, run_session, SessionReport};
pub use tokio_spawner::{build_runtime, TokioSpawner};
