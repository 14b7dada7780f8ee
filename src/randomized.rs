//! A randomized Binary Search Tree. Instead of enforcing a structural
//! invariant the way an AVL tree does, every node caches the size of its
//! subtree and insertion makes the new key the root of each subtree it
//! passes with probability `1 / (size + 1)`. The resulting tree is shaped as
//! if its keys had been inserted in uniformly random order, which keeps the
//! expected height at `O(lg N)` no matter how adversarial the insertion
//! order is. Removal merges the orphaned children with the same size-
//! weighted coin, preserving that distribution.
//!
//! The tree owns its source of randomness: pass any [`rand::Rng`] to
//! [`RandomizedTree::with_rng`] (a seeded one makes the structure
//! reproducible) or let [`RandomizedTree::new`] seed one from entropy.
//!
//! # Examples
//!
//! ```
//! use balanced_bst::randomized::RandomizedTree;
//!
//! let mut tree = RandomizedTree::new();
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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::SearchTree;

type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone, Debug)]
struct Node<T> {
    key: T,
    left: Link<T>,
    right: Link<T>,

    /// How many nodes are in the subtree rooted at this node, this one and
    /// duplicates included. Doubles as the weight for rebalancing coins.
    size: usize,
}

/// A probabilistically-balanced Binary Search Tree holding a multiset of
/// keys. This can be used for inserting, finding, and removing keys;
/// duplicates are stored as distinct nodes.
///
/// Unlike [`AvlTree`][crate::avl::AvlTree] there is no separate element
/// counter: the length is the root's cached subtree size.
#[derive(Clone, Debug)]
pub struct RandomizedTree<T, R = StdRng> {
    root: Link<T>,
    rng: R,
}

impl<T> RandomizedTree<T, StdRng> {
    /// Generates a new, empty `RandomizedTree` with a generator seeded from
    /// system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<T> Default for RandomizedTree<T, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: Rng> RandomizedTree<T, R> {
    /// Generates a new, empty `RandomizedTree` that draws its randomness
    /// from `rng`. Seeding the generator pins the exact tree structure,
    /// which is how the tests assert on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::randomized::RandomizedTree;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let mut tree = RandomizedTree::with_rng(StdRng::seed_from_u64(42));
    /// tree.insert("hello");
    /// assert!(tree.contains(&"hello"));
    /// ```
    pub fn with_rng(rng: R) -> Self {
        Self { root: None, rng }
    }

    /// Returns `true` if at least one copy of `key` is in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::randomized::RandomizedTree;
    ///
    /// let mut tree = RandomizedTree::new();
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
    /// use balanced_bst::randomized::RandomizedTree;
    ///
    /// let mut tree = RandomizedTree::new();
    ///
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, key: T)
    where
        T: Ord,
    {
        self.root = Some(insert(self.root.take(), key, &mut self.rng));
    }

    /// Removes one copy of `key` from the tree. If the tree does not contain
    /// the key, nothing happens - the recursion bottoms out at an empty
    /// subtree and returns it unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_bst::randomized::RandomizedTree;
    ///
    /// let mut tree = RandomizedTree::new();
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
        self.root = remove(self.root.take(), key, &mut self.rng);
    }

    /// The number of keys in the tree, counting duplicates. This is the
    /// root's cached subtree size, not a separate counter.
    pub fn len(&self) -> usize {
        size(&self.root)
    }

    /// Returns `true` if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl<T: Ord, R: Rng> SearchTree<T> for RandomizedTree<T, R> {
    fn contains(&self, key: &T) -> bool {
        RandomizedTree::contains(self, key)
    }

    fn insert(&mut self, key: T) {
        RandomizedTree::insert(self, key)
    }

    fn remove(&mut self, key: &T) {
        RandomizedTree::remove(self, key)
    }

    fn len(&self) -> usize {
        RandomizedTree::len(self)
    }
}

impl<T> Node<T> {
    fn new(key: T) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            size: 1,
        })
    }

    /// Adjusts the size of `self` to be the sum of its children's sizes + 1.
    fn fix_size(&mut self) {
        self.size = size(&self.left) + size(&self.right) + 1;
    }
}

fn size<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.size)
}

fn insert<T: Ord, R: Rng>(link: Link<T>, key: T, rng: &mut R) -> Box<Node<T>> {
    let mut node = match link {
        None => return Node::new(key),
        Some(node) => node,
    };
    // The subtree is about to have `size + 1` nodes; giving the new key the
    // root seat with probability 1/(size + 1) is what makes the tree look
    // uniformly randomly built.
    if rng.gen_range(0..=node.size) == 0 {
        return insert_at_root(Some(node), key);
    }
    if key < node.key {
        node.left = Some(insert(node.left.take(), key, rng));
    } else {
        // Equal keys go right, like any other not-less key.
        node.right = Some(insert(node.right.take(), key, rng));
    }
    node.fix_size();
    node
}

/// Inserts `key` at its BST position and then rotates it up one level per
/// unwound frame, so it surfaces as the root of this subtree.
fn insert_at_root<T: Ord>(link: Link<T>, key: T) -> Box<Node<T>> {
    let mut node = match link {
        None => return Node::new(key),
        Some(node) => node,
    };
    if key < node.key {
        node.left = Some(insert_at_root(node.left.take(), key));
        rotate_right(node)
    } else {
        node.right = Some(insert_at_root(node.right.take(), key));
        rotate_left(node)
    }
}

fn remove<T: Ord, R: Rng>(link: Link<T>, key: &T, rng: &mut R) -> Link<T> {
    let mut node = match link {
        None => return None,
        Some(node) => node,
    };
    match key.cmp(&node.key) {
        Ordering::Equal => return join(node.left.take(), node.right.take(), rng),
        Ordering::Less => node.left = remove(node.left.take(), key, rng),
        Ordering::Greater => node.right = remove(node.right.take(), key, rng),
    }
    node.fix_size();
    Some(node)
}

/// Merges two subtrees where every key in `first` is at most every key in
/// `second`. Which side supplies the merged root is decided by a coin
/// weighted by subtree size, so the merged tree stays distributed like one
/// built by random insertion.
fn join<T, R: Rng>(first: Link<T>, second: Link<T>, rng: &mut R) -> Link<T> {
    match (first, second) {
        (None, second) => second,
        (first, None) => first,
        (Some(mut first), Some(second))
            if rng.gen_range(0..first.size + second.size) < first.size =>
        {
            first.right = join(first.right.take(), Some(second), rng);
            first.fix_size();
            Some(first)
        }
        (first, Some(mut second)) => {
            second.left = join(first, second.left.take(), rng);
            second.fix_size();
            Some(second)
        }
    }
}

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut pivot = match node.right.take() {
        None => return node,
        Some(pivot) => pivot,
    };
    node.right = pivot.left.take();
    node.fix_size();
    pivot.left = Some(node);
    pivot.fix_size();
    pivot
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut pivot = match node.left.take() {
        None => return node,
        Some(pivot) => pivot,
    };
    node.left = pivot.right.take();
    node.fix_size();
    pivot.right = Some(node);
    pivot.fix_size();
    pivot
}

#[cfg(test)]
impl<T: Ord + std::fmt::Debug, R: Rng> RandomizedTree<T, R> {
    /// Walks the whole tree checking the BST ordering and that every cached
    /// size is exactly `1 + size(left) + size(right)`.
    fn assert_invariants(&self) {
        fn check<T: Ord + std::fmt::Debug>(link: &Link<T>) -> usize {
            let node = match link {
                None => return 0,
                Some(node) => node,
            };
            let left = check(&node.left);
            let right = check(&node.right);
            assert_eq!(
                node.size,
                left + right + 1,
                "stale size at {:?}",
                node.key
            );
            node.size
        }

        assert_eq!(check(&self.root), self.len());

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

    fn height(&self) -> usize {
        fn depth<T>(link: &Link<T>) -> usize {
            match link {
                None => 0,
                Some(node) => depth(&node.left).max(depth(&node.right)) + 1,
            }
        }

        depth(&self.root)
    }
}
