//! The Infomaniak integration: operation table, request builder, response
//! normalizer and the node that ties them to a transport.

pub mod builder;
pub mod images;
pub mod node;
pub mod normalize;
pub mod operation;
pub mod request;
pub mod table;

mod bodies;

pub use builder::build_request;
pub use node::{InfomaniakNode, NodeConfig, ACCESS_TOKEN, DEFAULT_BASE_URL};
pub use normalize::normalize;
pub use operation::{Operation, OperationKey, Resource};
pub use request::{Method, RequestDescriptor};
