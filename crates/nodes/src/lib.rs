//! `nodes` crate: the `ExecutableNode` trait and the Infomaniak node.
//!
//! Every node must implement [`ExecutableNode`]. The engine crate drives
//! execution item by item through this trait object.

pub mod error;
pub mod infomaniak;
pub mod mock;
pub mod params;
pub mod traits;
pub mod transport;

pub use error::NodeError;
pub use params::{ParameterAccessor, ParameterBag};
pub use traits::{ExecutableNode, ExecutionContext, OutputRecord};
pub use transport::{HttpRequest, HttpTransport, Transport, TransportConfig};
