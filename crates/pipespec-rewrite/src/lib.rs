//! Structural rewriting of pipeline graphs.
//!
//! Two inverse transforms over a graph implementation:
//!
//! - [`pack`] extracts a selection of tasks, inputs, and outputs into a new
//!   nested graph component and returns the wrapper task that replaces it,
//!   plus the rewiring the parent needs ([`apply_pack`] performs it).
//! - [`unpack`] splices a nested graph task back into its parent, renaming
//!   whatever would collide and reconnecting both sides of the boundary.
//!
//! Both share the boundary classification in [`boundary`]: an argument or
//! output binding that crosses the edge of a task set is identified by the
//! source it reads from, which is what makes boundary inputs deduplicate.
//!
//! Every function here takes its input specs by reference and returns new
//! values; nested components are shared through `Arc`.

pub mod apply;
pub mod boundary;
pub mod env;
pub mod error;
pub mod layout;
pub mod pack;
pub mod selection;
pub mod unpack;

pub use apply::apply_pack;
pub use boundary::{classify_argument, external_consumers, ArgumentClass, ExternalConsumer, SourceKey};
pub use env::RewriteEnv;
pub use error::{ElementKind, RewriteError};
pub use layout::{BoundingBox, LayoutConfig};
pub use pack::{pack, ConnectionMapping, ConnectionTarget, PackOptions, PackOutcome, DEFAULT_SUBGRAPH_NAME};
pub use selection::{Selection, SelectionItem};
pub use unpack::unpack;
