#![deny(missing_docs)]
#![doc = "Decorated graph primitives for the weight 11 hairy graph complex: edge-labeled simple graphs, the four-block vertex layout, the orientation sign, graph6 encoding, partition-respecting canonical labeling and hairy graph enumeration."]

pub mod canon;
mod decorated;
mod generators;
pub mod graph6;
mod graph;
mod layout;
pub mod orientation;
pub mod perm;

pub use canon::{canonical_form, CanonicalForm};
pub use decorated::{canonical_image, CanonicalImage, DecoratedGraph};
pub use generators::{connected_graphs, hairy_graphs};
pub use graph::{Edge, Graph};
pub use layout::{Layout, VertexKind};
pub use orientation::{edge_label_sign, perm_sign};
