mod arena;
mod handle;
mod node;
mod raw_rb_tree;
mod raw_static_tree;

pub(crate) use raw_rb_tree::RawRbTree;
pub(crate) use raw_static_tree::RawStaticTree;
