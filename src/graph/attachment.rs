//! Auxiliary objects attached to nodes, one per (node, type).

use super::{ControllerGraph, GraphError};
use crate::core::NodeId;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

struct Attached {
    kind: &'static str,
    value: Box<dyn Any>,
}

impl fmt::Debug for Attached {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind)
    }
}

#[derive(Debug, Default)]
pub(crate) struct AttachmentStore {
    by_node: HashMap<NodeId, Vec<Attached>>,
    cache: HashMap<(NodeId, TypeId), usize>,
}

impl AttachmentStore {
    fn ensure<T: Any + Default>(&mut self, node: NodeId) -> &mut T {
        let list = self.by_node.entry(node).or_default();
        let key = (node, TypeId::of::<T>());

        let cached = self
            .cache
            .get(&key)
            .copied()
            .filter(|&i| list.get(i).is_some_and(|a| a.value.is::<T>()));
        let index = match cached {
            Some(index) => index,
            None => {
                let index = match list.iter().position(|a| a.value.is::<T>()) {
                    Some(existing) => existing,
                    None => {
                        tracing::debug!(%node, kind = type_name::<T>(), "creating attachment");
                        list.push(Attached {
                            kind: type_name::<T>(),
                            value: Box::new(T::default()),
                        });
                        list.len() - 1
                    }
                };
                self.cache.insert(key, index);
                index
            }
        };

        match list[index].value.downcast_mut::<T>() {
            Some(value) => value,
            None => unreachable!("attachment slot {index} was checked to hold {}", type_name::<T>()),
        }
    }

    fn kinds(&self, node: NodeId) -> Vec<&'static str> {
        self.by_node
            .get(&node)
            .map(|list| list.iter().map(|a| a.kind).collect())
            .unwrap_or_default()
    }
}

impl ControllerGraph {
    /// Returns the attachment of type `T` on `node`, creating it on first use.
    pub fn ensure_attachment<T: Any + Default>(
        &mut self,
        node: impl Into<NodeId>,
    ) -> Result<&mut T, GraphError> {
        let node = node.into();
        self.node(node)?;
        Ok(self.attachments.ensure::<T>(node))
    }

    /// Type names of the attachments present on `node`, in creation order.
    pub fn attachment_kinds(&self, node: impl Into<NodeId>) -> Vec<&'static str> {
        self.attachments.kinds(node.into())
    }
}
