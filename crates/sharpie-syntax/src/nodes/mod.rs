mod node;
mod token;
mod tree;

pub(crate) use node::{Child, List, Node, Nodes};
pub(crate) use token::{AttachedTrivia, Token};
pub(crate) use tree::TreeInner;
