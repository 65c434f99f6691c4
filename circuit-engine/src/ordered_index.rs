//! The balanced order-statistic search tree at the heart of the verifier
//!
//! [`OrderedIndex`] is an AVL tree augmented with subtree-size counts,
//! supporting insert, delete, ascending range enumeration, and range
//! counting without enumeration (via rank), all in `O(log N)` (enumeration
//! is `O(log N + m)` for a result of size `m`).
//!
//! # Arena representation
//!
//! Rather than modeling the tree with owned child links and a non-owning
//! parent pointer (which still requires `unsafe` or reference counting to
//! get parent links right in safe Rust), nodes live in a flat arena and
//! every link — parent, left, right — is an [`Option<NodeHandle>`]. A
//! rotation or a splice is then just a handful of handle reassignments.
//! Freed slots go on a free-list so a long verifier run does not grow the
//! arena unboundedly across interleaved inserts and removes.
//!
//! No sentinel header node is exposed or used internally: the tree keeps a
//! single `root: Option<NodeHandle>` field, reassigned by every mutating
//! operation.

use circuit_core::error::{Error, Result};
use circuit_core::order_key::OrderKey;
use std::cmp::Ordering;

/// A handle into the index's node arena
///
/// Handles are never exposed outside this module; they are an
/// implementation detail of the arena representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeHandle(usize);

#[derive(Debug, Clone)]
struct Node {
    key: OrderKey,
    height: i64,
    size: usize,
    parent: Option<NodeHandle>,
    left: Option<NodeHandle>,
    right: Option<NodeHandle>,
}

/// A self-balancing, order-statistic binary search tree over [`OrderKey`]
///
/// # Invariants maintained after every public operation
///
/// - BST order: left subtree keys < node key < right subtree keys.
/// - AVL balance: `|height(left) - height(right)| <= 1` at every node.
/// - `height = 1 + max(height(left), height(right))`, empty subtree `-1`.
/// - `size = 1 + size(left) + size(right)`, empty subtree `0`.
/// - Parent pointers are consistent with child links.
#[derive(Debug, Default)]
pub struct OrderedIndex {
    arena: Vec<Option<Node>>,
    free_list: Vec<NodeHandle>,
    root: Option<NodeHandle>,
}

impl OrderedIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            free_list: Vec::new(),
            root: None,
        }
    }

    /// The number of keys currently stored
    pub fn len(&self) -> usize {
        self.subtree_size(self.root)
    }

    /// True if the index holds no keys
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The height of the tree, `-1` if empty
    pub fn height(&self) -> i64 {
        self.subtree_height(self.root)
    }

    /// Inserts `key` into the index
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if an equal key is already present.
    pub fn insert(&mut self, key: OrderKey) -> Result<()> {
        let new_root = self.insert_rec(self.root, None, key)?;
        self.root = Some(new_root);
        log::trace!("ordered index: inserted, size is now {}", self.len());
        Ok(())
    }

    /// Removes `key` from the index
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingKey`] if no equal key is present.
    pub fn remove(&mut self, key: &OrderKey) -> Result<()> {
        self.root = self.remove_rec(self.root, key)?;
        if let Some(root) = self.root {
            self.get_mut(root).parent = None;
        }
        log::trace!("ordered index: removed, size is now {}", self.len());
        Ok(())
    }

    /// All stored keys `k` with `lo <= k <= hi`, in ascending order
    ///
    /// Runs in `O(log N + m)` where `m` is the result size. An empty or
    /// out-of-range interval (including `hi < lo`) yields an empty vector.
    pub fn list(&self, lo: &OrderKey, hi: &OrderKey) -> Vec<OrderKey> {
        let mut out = Vec::new();
        if hi < lo {
            return out;
        }
        let start = self.lca(self.root, lo, hi);
        self.collect_in_order(start, lo, hi, &mut out);
        out
    }

    /// The number of stored keys `k` with `lo <= k <= hi`
    ///
    /// Runs in `O(log N)`: computed from rank, never enumerates.
    pub fn count(&self, lo: &OrderKey, hi: &OrderKey) -> usize {
        if hi < lo {
            return 0;
        }
        let (_, rank_hi) = self.rank(hi);
        let (hit_lo, rank_lo) = self.rank(lo);
        rank_hi - rank_lo + usize::from(hit_lo)
    }

    // ---- arena access -------------------------------------------------

    fn get(&self, h: NodeHandle) -> &Node {
        self.arena[h.0].as_ref().expect("live handle")
    }

    fn get_mut(&mut self, h: NodeHandle) -> &mut Node {
        self.arena[h.0].as_mut().expect("live handle")
    }

    fn alloc(&mut self, key: OrderKey, parent: Option<NodeHandle>) -> NodeHandle {
        let node = Node {
            key,
            height: 0,
            size: 1,
            parent,
            left: None,
            right: None,
        };
        if let Some(h) = self.free_list.pop() {
            self.arena[h.0] = Some(node);
            h
        } else {
            self.arena.push(Some(node));
            NodeHandle(self.arena.len() - 1)
        }
    }

    fn free(&mut self, h: NodeHandle) {
        self.arena[h.0] = None;
        self.free_list.push(h);
    }

    fn subtree_height(&self, h: Option<NodeHandle>) -> i64 {
        match h {
            None => -1,
            Some(h) => self.get(h).height,
        }
    }

    fn subtree_size(&self, h: Option<NodeHandle>) -> usize {
        match h {
            None => 0,
            Some(h) => self.get(h).size,
        }
    }

    fn balance_factor(&self, h: NodeHandle) -> i64 {
        self.subtree_height(self.get(h).right) - self.subtree_height(self.get(h).left)
    }

    /// Recomputes `height` and `size` for `h` from its (already up to date)
    /// children.
    fn update(&mut self, h: NodeHandle) {
        let left = self.get(h).left;
        let right = self.get(h).right;
        let height = 1 + self.subtree_height(left).max(self.subtree_height(right));
        let size = 1 + self.subtree_size(left) + self.subtree_size(right);
        let node = self.get_mut(h);
        node.height = height;
        node.size = size;
    }

    // ---- rotations ------------------------------------------------------

    /// Left-rotates at `x`, returning the new subtree root.
    ///
    /// `x` is the lower node after the rotation, so it is updated first.
    fn rotate_left(&mut self, x: NodeHandle) -> NodeHandle {
        let y = self.get(x).right.expect("rotate_left requires a right child");
        let t2 = self.get(y).left;

        self.get_mut(x).right = t2;
        if let Some(t2) = t2 {
            self.get_mut(t2).parent = Some(x);
        }

        self.get_mut(y).left = Some(x);
        self.get_mut(x).parent = Some(y);

        self.update(x);
        self.update(y);
        y
    }

    /// Right-rotates at `x`, returning the new subtree root.
    fn rotate_right(&mut self, x: NodeHandle) -> NodeHandle {
        let y = self.get(x).left.expect("rotate_right requires a left child");
        let t2 = self.get(y).right;

        self.get_mut(x).left = t2;
        if let Some(t2) = t2 {
            self.get_mut(t2).parent = Some(x);
        }

        self.get_mut(y).right = Some(x);
        self.get_mut(x).parent = Some(y);

        self.update(x);
        self.update(y);
        y
    }

    /// Restores the AVL property at `h`, which is assumed to already have
    /// correctly balanced children. Returns the (possibly new) subtree root.
    fn rebalance(&mut self, h: NodeHandle) -> NodeHandle {
        self.update(h);
        let bf = self.balance_factor(h);

        if bf >= 2 {
            let right = self.get(h).right.expect("bf >= 2 implies a right child");
            if self.balance_factor(right) < 0 {
                // Right child is left-heavy: rotate it right first (RL).
                let new_right = self.rotate_right(right);
                self.get_mut(h).right = Some(new_right);
                self.get_mut(new_right).parent = Some(h);
            }
            self.rotate_left(h)
        } else if bf <= -2 {
            let left = self.get(h).left.expect("bf <= -2 implies a left child");
            if self.balance_factor(left) > 0 {
                // Left child is right-heavy: rotate it left first (LR).
                let new_left = self.rotate_left(left);
                self.get_mut(h).left = Some(new_left);
                self.get_mut(new_left).parent = Some(h);
            }
            self.rotate_right(h)
        } else {
            h
        }
    }

    // ---- insert -----------------------------------------------------------

    fn insert_rec(
        &mut self,
        node: Option<NodeHandle>,
        parent: Option<NodeHandle>,
        key: OrderKey,
    ) -> Result<NodeHandle> {
        let n = match node {
            None => return Ok(self.alloc(key, parent)),
            Some(n) => n,
        };

        match key.cmp(&self.get(n).key) {
            Ordering::Equal => Err(Error::DuplicateKey),
            Ordering::Less => {
                let left = self.get(n).left;
                let new_left = self.insert_rec(left, Some(n), key)?;
                self.get_mut(n).left = Some(new_left);
                let new_n = self.rebalance(n);
                self.get_mut(new_n).parent = parent;
                Ok(new_n)
            }
            Ordering::Greater => {
                let right = self.get(n).right;
                let new_right = self.insert_rec(right, Some(n), key)?;
                self.get_mut(n).right = Some(new_right);
                let new_n = self.rebalance(n);
                self.get_mut(new_n).parent = parent;
                Ok(new_n)
            }
        }
    }

    // ---- remove -------------------------------------------------------

    fn leftmost(&self, mut n: NodeHandle) -> NodeHandle {
        while let Some(l) = self.get(n).left {
            n = l;
        }
        n
    }

    fn remove_rec(&mut self, node: Option<NodeHandle>, key: &OrderKey) -> Result<Option<NodeHandle>> {
        let n = node.ok_or(Error::MissingKey)?;

        match key.cmp(&self.get(n).key) {
            Ordering::Less => {
                let left = self.get(n).left;
                let new_left = self.remove_rec(left, key)?;
                self.get_mut(n).left = new_left;
                if let Some(l) = new_left {
                    self.get_mut(l).parent = Some(n);
                }
                Ok(Some(self.rebalance(n)))
            }
            Ordering::Greater => {
                let right = self.get(n).right;
                let new_right = self.remove_rec(right, key)?;
                self.get_mut(n).right = new_right;
                if let Some(r) = new_right {
                    self.get_mut(r).parent = Some(n);
                }
                Ok(Some(self.rebalance(n)))
            }
            Ordering::Equal => {
                let left = self.get(n).left;
                let right = self.get(n).right;
                match (left, right) {
                    (None, None) => {
                        self.free(n);
                        Ok(None)
                    }
                    (Some(child), None) | (None, Some(child)) => {
                        self.free(n);
                        Ok(Some(child))
                    }
                    (Some(_), Some(right)) => {
                        let successor = self.leftmost(right);
                        let successor_key = self.get(successor).key;
                        self.get_mut(n).key = successor_key;
                        let new_right = self.remove_rec(Some(right), &successor_key)?;
                        self.get_mut(n).right = new_right;
                        if let Some(r) = new_right {
                            self.get_mut(r).parent = Some(n);
                        }
                        Ok(Some(self.rebalance(n)))
                    }
                }
            }
        }
    }

    // ---- range queries --------------------------------------------------

    /// First node during descent whose key lies in `[lo, hi]` — the branch
    /// point from which range enumeration splits.
    fn lca(&self, mut node: Option<NodeHandle>, lo: &OrderKey, hi: &OrderKey) -> Option<NodeHandle> {
        loop {
            let n = node?;
            let key = self.get(n).key;
            if *lo <= key && key <= *hi {
                return Some(n);
            }
            node = if *lo < key {
                self.get(n).left
            } else {
                self.get(n).right
            };
        }
    }

    fn collect_in_order(
        &self,
        node: Option<NodeHandle>,
        lo: &OrderKey,
        hi: &OrderKey,
        out: &mut Vec<OrderKey>,
    ) {
        let n = match node {
            Some(n) => n,
            None => return,
        };
        let key = self.get(n).key;
        if key >= *lo {
            self.collect_in_order(self.get(n).left, lo, hi, out);
        }
        if key >= *lo && key <= *hi {
            out.push(key);
        }
        if key <= *hi {
            self.collect_in_order(self.get(n).right, lo, hi, out);
        }
    }

    /// `(present, count)`: whether `key` is stored, and the number of
    /// stored keys strictly less than `key`.
    fn rank(&self, key: &OrderKey) -> (bool, usize) {
        self.rank_rec(self.root, key)
    }

    fn rank_rec(&self, node: Option<NodeHandle>, key: &OrderKey) -> (bool, usize) {
        let n = match node {
            Some(n) => n,
            None => return (false, 0),
        };
        let node_key = self.get(n).key;
        match key.cmp(&node_key) {
            Ordering::Greater => {
                let (hit, count) = self.rank_rec(self.get(n).right, key);
                (hit, count + 1 + self.subtree_size(self.get(n).left))
            }
            Ordering::Less => self.rank_rec(self.get(n).left, key),
            Ordering::Equal => (true, self.subtree_size(self.get(n).left)),
        }
    }

    // ---- invariant checking (used by tests) ----------------------------

    #[cfg(test)]
    fn check_invariants(&self) {
        fn walk(index: &OrderedIndex, h: Option<NodeHandle>) -> (i64, usize) {
            let n = match h {
                None => return (-1, 0),
                Some(n) => n,
            };
            let node = index.get(n);
            let (lh, ls) = walk(index, node.left);
            let (rh, rs) = walk(index, node.right);
            assert!(
                (lh - rh).abs() <= 1,
                "AVL balance violated at a node: {} vs {}",
                lh,
                rh
            );
            assert_eq!(node.height, 1 + lh.max(rh), "height mismatch");
            assert_eq!(node.size, 1 + ls + rs, "size mismatch");
            if let Some(l) = node.left {
                assert_eq!(index.get(l).parent, Some(n), "left child parent mismatch");
                assert!(index.get(l).key < node.key, "BST order violated on the left");
            }
            if let Some(r) = node.right {
                assert_eq!(
                    index.get(r).parent,
                    Some(n),
                    "right child parent mismatch"
                );
                assert!(index.get(r).key > node.key, "BST order violated on the right");
            }
            (node.height, node.size)
        }
        walk(self, self.root);
        if let Some(root) = self.root {
            assert_eq!(self.get(root).parent, None, "root must have no parent");
        }
    }
}
