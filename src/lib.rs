//! Upload-to-OSS plugin node for a visual node-based image-processing host.
//!
//! The node takes a pre-signed OSS PUT URL and an image tensor, encodes the
//! image as PNG, and PUTs the bytes to the URL with bounded retries. The host
//! discovers the node through [`node::NodeRegistry`] and drives
//! [`node::UploadOssNode::execute`] per invocation.
//!
//! All logging goes through the [`log`] facade; the host process installs its
//! logger once at startup, this crate never initializes one.

pub mod errors;
pub mod node;
pub mod tensor;
pub mod uploader;
pub mod validation;

pub use errors::{NodeError, NodeResult};
pub use node::{NodeDescriptor, NodeRegistry, PortKind, PortSpec, UploadOssNode};
pub use tensor::{ImageTensor, PixelFrame};
pub use uploader::{OssClient, RetryConfig, RetryPolicy, UploadOutcome, UploadRequest};
