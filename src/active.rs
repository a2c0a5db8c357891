// Copyright 2025 Lars Brubaker
// License: MIT
//
// The active-segment list of the radial sweep.
//
// A doubly-linked list ordered nearest-first from the sweep centre. The
// ordering predicate is not transitive, so there is no search: a new key
// walks forward from the front and is linked in before the first occupant
// it should not pass. Keys are SegmentIdx values; INVALID marks the
// sentinel and freed nodes.

use crate::segment::{SegmentIdx, INVALID};

/// Index into ActiveList::nodes
pub type NodeIdx = u32;

#[derive(Clone, Debug)]
pub struct ActiveNode {
    pub key: SegmentIdx, // INVALID for the sentinel and for free nodes
    pub next: NodeIdx,
    pub prev: NodeIdx,
}

impl Default for ActiveNode {
    fn default() -> Self {
        ActiveNode {
            key: INVALID,
            next: INVALID,
            prev: INVALID,
        }
    }
}

/// Index of the head sentinel node.
// Circular: head.prev == head.next == head when empty.
pub const LIST_HEAD: NodeIdx = 0;

#[derive(Clone, Debug)]
pub struct ActiveList {
    pub nodes: Vec<ActiveNode>,
    /// slot[key] is the node holding `key`, or INVALID.
    slot: Vec<NodeIdx>,
    free: Vec<NodeIdx>,
    len: usize,
}

impl ActiveList {
    pub fn new() -> Self {
        let head = ActiveNode {
            key: INVALID,
            next: LIST_HEAD,
            prev: LIST_HEAD,
        };
        ActiveList {
            nodes: vec![head],
            slot: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Insert `key`, walking from the front while `pass(occupant)` holds.
    /// The key lands before the first occupant it may not pass, or at the
    /// back. A key that is already present is moved.
    pub fn insert<F>(&mut self, key: SegmentIdx, mut pass: F) -> NodeIdx
    where
        F: FnMut(SegmentIdx) -> bool,
    {
        self.remove(key);

        let mut next = self.nodes[LIST_HEAD as usize].next;
        while next != LIST_HEAD {
            if !pass(self.nodes[next as usize].key) {
                break;
            }
            next = self.nodes[next as usize].next;
        }
        let prev = self.nodes[next as usize].prev;

        let node = ActiveNode { key, next, prev };
        let new_idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as NodeIdx
            }
        };
        self.nodes[prev as usize].next = new_idx;
        self.nodes[next as usize].prev = new_idx;

        let k = key as usize;
        if self.slot.len() <= k {
            self.slot.resize(k + 1, INVALID);
        }
        self.slot[k] = new_idx;
        self.len += 1;
        new_idx
    }

    /// Unlink `key`. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: SegmentIdx) {
        let node = match self.slot.get(key as usize) {
            Some(&n) if n != INVALID => n,
            _ => return,
        };
        let next = self.nodes[node as usize].next;
        let prev = self.nodes[node as usize].prev;
        self.nodes[next as usize].prev = prev;
        self.nodes[prev as usize].next = next;
        self.nodes[node as usize] = ActiveNode::default();
        self.slot[key as usize] = INVALID;
        self.free.push(node);
        self.len -= 1;
    }

    /// Nearest active segment, if any.
    #[inline]
    pub fn front(&self) -> Option<SegmentIdx> {
        let first = self.nodes[LIST_HEAD as usize].next;
        if first == LIST_HEAD {
            None
        } else {
            Some(self.nodes[first as usize].key)
        }
    }

    #[inline]
    pub fn contains(&self, key: SegmentIdx) -> bool {
        matches!(self.slot.get(key as usize), Some(&n) if n != INVALID)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Keys from front to back.
    pub fn iter(&self) -> impl Iterator<Item = SegmentIdx> + '_ {
        let mut node = self.nodes[LIST_HEAD as usize].next;
        std::iter::from_fn(move || {
            if node == LIST_HEAD {
                return None;
            }
            let key = self.nodes[node as usize].key;
            node = self.nodes[node as usize].next;
            Some(key)
        })
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[LIST_HEAD as usize].next = LIST_HEAD;
        self.nodes[LIST_HEAD as usize].prev = LIST_HEAD;
        self.slot.clear();
        self.free.clear();
        self.len = 0;
    }
}

impl Default for ActiveList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ordered by key value, smallest at the front.
    fn insert_sorted(list: &mut ActiveList, key: u32) {
        list.insert(key, |occupant| occupant < key);
    }

    #[test]
    fn empty_list() {
        let list = ActiveList::new();
        assert_eq!(list.front(), None);
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn insert_and_order() {
        let mut list = ActiveList::new();
        insert_sorted(&mut list, 3);
        insert_sorted(&mut list, 1);
        insert_sorted(&mut list, 2);

        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(list.front(), Some(1));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn insert_stops_at_first_refusal() {
        // The walk never looks past the first occupant it may not pass.
        let mut list = ActiveList::new();
        list.insert(5, |_| true);
        list.insert(2, |_| true);
        let mut seen = Vec::new();
        list.insert(9, |occupant| {
            seen.push(occupant);
            false
        });
        assert_eq!(seen, vec![5]);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![9, 5, 2]);
    }

    #[test]
    fn remove_node() {
        let mut list = ActiveList::new();
        insert_sorted(&mut list, 1);
        insert_sorted(&mut list, 2);
        insert_sorted(&mut list, 3);

        list.remove(2);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert!(!list.contains(2));
        assert!(list.contains(3));

        list.remove(1);
        assert_eq!(list.front(), Some(3));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut list = ActiveList::new();
        insert_sorted(&mut list, 1);
        list.remove(7);
        list.remove(1);
        list.remove(1);
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
    }

    #[test]
    fn reinsert_moves_key() {
        let mut list = ActiveList::new();
        insert_sorted(&mut list, 1);
        insert_sorted(&mut list, 2);
        list.insert(1, |_| true);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn freed_nodes_are_reused() {
        let mut list = ActiveList::new();
        for k in 0..4 {
            insert_sorted(&mut list, k);
        }
        let allocated = list.nodes.len();
        for _ in 0..10 {
            list.remove(2);
            insert_sorted(&mut list, 2);
        }
        assert_eq!(list.nodes.len(), allocated);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn clear_resets() {
        let mut list = ActiveList::new();
        insert_sorted(&mut list, 4);
        insert_sorted(&mut list, 8);
        list.clear();
        assert!(list.is_empty());
        assert!(!list.contains(4));
        insert_sorted(&mut list, 8);
        assert_eq!(list.front(), Some(8));
    }
}
