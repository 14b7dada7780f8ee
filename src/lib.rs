//! This crate exposes two self-balancing Binary Search Trees (BSTs) that
//! keep a multiset of ordered keys balanced with very different disciplines.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! sometimes has child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than or equal to its own key. (Both trees here route equal
//!    keys rightward, so inserting a duplicate always creates a new node.)
//!
//! Searching a BST takes `O(height)` (where `height` is defined as the
//! longest path from the root `Node` to a leaf `Node`), so everything hinges
//! on keeping the height close to `lg N`. The two implementations get there
//! differently:
//!
//! * [`avl::AvlTree`] caches a height in every node and restores the strict
//!   AVL invariant with rotations after every insert and remove. Its
//!   `O(lg N)` height is guaranteed.
//! * [`randomized::RandomizedTree`] caches a subtree size in every node and
//!   uses it to make size-weighted random choices - re-rooting on insertion,
//!   weighted merging on deletion - so its height is `O(lg N)` in
//!   expectation for *any* insertion order.

#![deny(missing_docs)]

pub mod avl;
pub mod randomized;

#[cfg(test)]
mod test {
    pub(crate) mod quick;
}

/// The operations shared by both tree implementations: point membership,
/// point insertion, and point removal over a totally-ordered key type.
///
/// The two implementors share no code, only this contract. Note these are
/// multiset semantics: inserting an already-present key stores a second copy
/// rather than overwriting, and [`len`][SearchTree::len] counts copies.
///
/// # Examples
///
/// ```
/// use balanced_bst::SearchTree;
/// use balanced_bst::avl::AvlTree;
/// use balanced_bst::randomized::RandomizedTree;
///
/// fn load<T: SearchTree<i32>>(tree: &mut T) {
///     for key in [5, 3, 8, 3] {
///         tree.insert(key);
///     }
///     assert!(tree.contains(&3));
///     assert_eq!(tree.len(), 4);
/// }
///
/// load(&mut AvlTree::new());
/// load(&mut RandomizedTree::new());
/// ```
pub trait SearchTree<T: Ord> {
    /// Returns `true` if at least one copy of `key` is in the tree.
    fn contains(&self, key: &T) -> bool;

    /// Inserts `key` into the tree. Duplicates are kept as distinct nodes.
    fn insert(&mut self, key: T);

    /// Removes one copy of `key` from the tree. Removing a key that isn't
    /// present leaves the tree untouched.
    fn remove(&mut self, key: &T);

    /// The number of keys in the tree, counting duplicates.
    fn len(&self) -> usize;

    /// Returns `true` if the tree holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
