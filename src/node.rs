use std::collections::HashMap;

use serde::Serialize;

use crate::errors::{NodeError, NodeResult};
use crate::tensor::ImageTensor;
use crate::uploader::{OssClient, UploadRequest};

pub const UPLOAD_OSS_NODE_ID: &str = "upload_oss";

/// Value kinds flowing through node ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Text,
    Image,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSpec {
    pub name: &'static str,
    pub kind: PortKind,
}

/// Static description of a node: what the host shows in its palette and how
/// it wires the node into a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
}

/// Descriptor registry the host's plugin loader consumes at startup.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    descriptors: HashMap<&'static str, NodeDescriptor>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with every node this crate provides.
    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        registry.register(UploadOssNode::descriptor());
        registry
    }

    pub fn register(&mut self, descriptor: NodeDescriptor) {
        let id = descriptor.id;
        if self.descriptors.insert(id, descriptor).is_some() {
            log::warn!("Node id {} registered twice, keeping the newest", id);
        }
    }

    pub fn descriptor(&self, id: &str) -> Option<&NodeDescriptor> {
        self.descriptors.get(id)
    }

    /// Node id to palette display name, for the host's menu.
    pub fn display_names(&self) -> HashMap<&'static str, &'static str> {
        self.descriptors
            .values()
            .map(|descriptor| (descriptor.id, descriptor.display_name))
            .collect()
    }

    /// All descriptors as JSON, sorted by id so the output is stable.
    pub fn to_json(&self) -> NodeResult<String> {
        let mut descriptors: Vec<&NodeDescriptor> = self.descriptors.values().collect();
        descriptors.sort_by_key(|descriptor| descriptor.id);
        Ok(serde_json::to_string(&descriptors)?)
    }
}

/// The upload node: PNG-encode an image tensor and PUT it to a pre-signed
/// OSS URL.
pub struct UploadOssNode {
    client: OssClient,
}

impl UploadOssNode {
    pub fn new() -> Self {
        Self {
            client: OssClient::new(),
        }
    }

    pub fn with_client(client: OssClient) -> Self {
        Self { client }
    }

    pub fn descriptor() -> NodeDescriptor {
        NodeDescriptor {
            id: UPLOAD_OSS_NODE_ID,
            display_name: "Upload Image to OSS",
            category: "utils",
            inputs: vec![
                PortSpec {
                    name: "oss_put_url",
                    kind: PortKind::Text,
                },
                PortSpec {
                    name: "image",
                    kind: PortKind::Image,
                },
            ],
            outputs: vec![PortSpec {
                name: "uploaded",
                kind: PortKind::Boolean,
            }],
        }
    }

    /// Node execution entry point. Returns `Ok(true)` once the payload is
    /// delivered; every failure surfaces as an error to the host, which owns
    /// user-visible reporting.
    pub async fn execute(
        &self,
        destination_url: &str,
        image: &ImageTensor,
    ) -> NodeResult<bool> {
        let frame = image.normalize()?;
        let png = frame.encode_png()?;

        let request = UploadRequest::new(destination_url, png);
        let outcome = self.client.upload(&request).await?;

        if !outcome.succeeded {
            return Err(NodeError::upload_failed(outcome.detail));
        }

        Ok(true)
    }
}

impl Default for UploadOssNode {
    fn default() -> Self {
        Self::new()
    }
}
