/**
 * File: /src/ppc/tree.rs
 * Created Date: Tuesday, October 6th 2026
 * Author: Zihan
 * -----
 * Last Modified: Thursday, 15th October 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-10-06		Zihan	Arena-backed prefix-count tree
 */

use crate::types::{ItemCode, Support};

/// Index of a node in the tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct PpcNode {
    pub item: ItemCode,
    pub count: Support,
    pub pre: u32,
    pub pos: u32,
    parent: Option<NodeId>,
    /// Ascending by `item`
    children: Vec<NodeId>,
}

impl PpcNode {
    fn new(item: ItemCode, parent: Option<NodeId>) -> Self {
        Self {
            item,
            count: 1,
            pre: 0,
            pos: 0,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Prefix-count tree over transactions. Node 0 is the root and carries no item.
#[derive(Debug, Clone)]
pub struct PpcTree {
    nodes: Vec<PpcNode>,
    coded: bool,
}

impl Default for PpcTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PpcTree {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        let mut root = PpcNode::new(0, None);
        root.count = 0;
        Self {
            nodes: vec![root],
            coded: false,
        }
    }

    /// Insert one transaction given as ascending item codes. Codes are walked
    /// from the largest down, so large codes end up near the root.
    pub fn insert(&mut self, transaction: &[ItemCode]) {
        let mut current = Self::ROOT;
        for &code in transaction.iter().rev() {
            let found = self.nodes[current]
                .children
                .binary_search_by(|&c| self.nodes[c].item.cmp(&code));
            current = match found {
                Ok(pos) => {
                    let child = self.nodes[current].children[pos];
                    self.nodes[child].count += 1;
                    child
                }
                Err(pos) => {
                    let child = self.nodes.len();
                    self.nodes.push(PpcNode::new(code, Some(current)));
                    self.nodes[current].children.insert(pos, child);
                    child
                }
            };
        }
        if !transaction.is_empty() {
            self.nodes[Self::ROOT].count += 1;
            self.coded = false;
        }
    }

    /// Euler-tour numbering: `pre` on entry, `pos` on exit, both from 1.
    /// Root included.
    pub fn assign_traversal_codes(&mut self) {
        let mut pre = 1u32;
        let mut pos = 1u32;
        // (node, index of the next child to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(Self::ROOT, 0)];
        self.nodes[Self::ROOT].pre = pre;
        pre += 1;

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            if next < self.nodes[node].children.len() {
                top.1 += 1;
                let child = self.nodes[node].children[next];
                self.nodes[child].pre = pre;
                pre += 1;
                stack.push((child, 0));
            } else {
                self.nodes[node].pos = pos;
                pos += 1;
                stack.pop();
            }
        }
        self.coded = true;
    }

    pub fn is_coded(&self) -> bool {
        self.coded
    }

    pub fn node(&self, id: NodeId) -> &PpcNode {
        &self.nodes[id]
    }

    /// Number of nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of transactions inserted (empty ones ignored).
    pub fn transaction_count(&self) -> Support {
        self.nodes[Self::ROOT].count
    }

    pub fn root_children(&self) -> &[NodeId] {
        &self.nodes[Self::ROOT].children
    }

    /// Ancestors of `id` from its parent upward, root excluded.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes[id].parent.filter(|&p| p != Self::ROOT),
        }
    }

    /// `id` and all its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Subtree<'_> {
        Subtree {
            tree: self,
            stack: vec![id],
        }
    }

    /// Every node except the root, in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.subtree(Self::ROOT).skip(1)
    }

    /// `a` is a proper ancestor of `b`. Requires traversal codes.
    pub fn is_ancestor(&self, a: NodeId, b: NodeId) -> bool {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        a.pre < b.pre && a.pos > b.pos
    }
}

pub struct Ancestors<'a> {
    tree: &'a PpcTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a PpcNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.tree.nodes[id];
        self.next = node.parent.filter(|&p| p != PpcTree::ROOT);
        Some(node)
    }
}

pub struct Subtree<'a> {
    tree: &'a PpcTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Subtree<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[id].children.iter().rev().copied());
        Some(id)
    }
}
