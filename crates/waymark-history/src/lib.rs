//! Client-side navigation state for Waymark.
//!
//! - [`Location`] / [`WindowLocation`]: the current URL snapshot
//! - [`WindowHistory`]: an explicit, inspectable history stack
//! - [`RouterUrl`]: actual URL, state URL override and service URLs
//! - [`GuardRegistry`]: synchronous navigation vetoes
//! - [`Router`]: the facade tying them together, with mask watchers
//!
//! Everything here is single-threaded. Guards, listeners and watchers are
//! plain closures and the router is not `Send`.

pub mod error;
pub mod guard;
pub mod history;
pub mod location;
pub mod router;
pub mod router_url;

pub use error::{HistoryError, RouterError};
pub use guard::{GuardHandle, GuardRegistry};
pub use history::{HistoryAdapter, HistoryEvent, HistoryState, NavigationType, WindowHistory};
pub use location::{Location, WindowLocation};
pub use router::{NavigateOptions, Navigation, Router, WatchHandle};
pub use router_url::{RouterUrl, service_url};
