//! JSON-RPC client plumbing.
//!
//! # Data Flow
//! ```text
//! (method, params)
//!     → types.rs (RpcRequest envelope with UUID id)
//!     → transport.rs (HTTP POST, basic auth, timeout, TLS setting)
//!     → types.rs (RpcResponse: non-null error → RpcError::Rpc)
//! ```

pub mod transport;
pub mod types;

pub use transport::{HttpTransport, RpcTransport};
pub use types::{RpcError, RpcRequest, RpcResponse, RpcResult};
