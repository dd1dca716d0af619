//! Per-table entity clients and the schema registry they are built from.

pub mod post;

pub use post::{Post, PostClient, PostCreateInput, PostQuery, PostSchema, PostUpdateInput};

/// Table and column descriptors for every entity, built once at startup and
/// handed to [`Client`](crate::Client).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub posts: PostSchema,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }
}
