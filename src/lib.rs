//! A tree-structured URL router with ordered, fallthrough dispatch.
//!
//! ```rust
//! use routeit::{Outcome, Route, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router: Router<String> = Router::new(
//!     Route::new("/users").children([
//!         Route::new("/:id").action(|_, params| {
//!             Ok(Outcome::Produced(format!("user {}", params.get("id").unwrap())))
//!         }),
//!     ]),
//! )?;
//!
//! assert_eq!(router.resolve("/users/42")?, "user 42");
//! assert_eq!(router.resolve("/nothing").unwrap_err().status(), Some(404));
//! # Ok(())
//! # }
//! ```
//!
//! See the [`router`](crate::Router) documentation for how candidates are
//! selected.
#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod cache;
mod context;
mod error;
mod handler;
mod matches;
mod params;
mod path;
mod pattern;
mod route;
mod router;
mod tree;

pub use context::{Context, Continuation};
pub use error::{BuildError, Error, PatternError};
pub use handler::{Action, DefaultResolver, Outcome, Resolve};
pub use matches::Match;
pub use params::{ParamValue, Params, ParamsIter};
pub use pattern::{Mode, ParamKey, Pattern};
pub use route::{Route, RouteRef};
pub use router::{ErrorContext, Router, RouterBuilder};
pub use tree::RouteId;
