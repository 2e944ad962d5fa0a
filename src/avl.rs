use std::{mem, ops::Deref};

use log::debug;
use rand::Rng;

use crate::depth::Depth;
use crate::error::AvlError;
use crate::policy::{KeyEq, KeyOrder, Natural};

/// Avl manage a single instance of in-memory index using
/// [AVL][avl] tree.
///
/// Keys are ordered by the `O` policy and matched by the `E` policy,
/// both default to the key's natural `Ord` and `Eq`.
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
#[derive(Clone)]
pub struct Avl<K, V, O = Natural, E = Natural> {
    name: String,
    root: Option<Box<Node<K, V>>>,
    n_count: usize, // number of entries in the tree.
    order: O,
    equal: E,
}

/// Different ways to construct a new Avl instance.
impl<K, V> Avl<K, V>
where
    K: Ord,
{
    /// Create an empty instance of Avl, identified by `name`, ordering
    /// keys by their natural order. Applications can choose unique names.
    pub fn new<S>(name: S) -> Avl<K, V>
    where
        S: AsRef<str>,
    {
        Avl::with_policies(name, Natural, Natural)
    }

    /// Create a new instance of Avl tree and load it with entries
    /// from `iter`. Entries with duplicate keys overwrite each other,
    /// the last one wins.
    pub fn load_from<S, I>(name: S, iter: I) -> Avl<K, V>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut avl = Avl::new(name);
        for (key, value) in iter {
            avl.insert(key, value);
        }
        debug!("{}: loaded {} entries", avl.name, avl.n_count);
        avl
    }
}

impl<K, V, O, E> Avl<K, V, O, E>
where
    O: KeyOrder<K>,
    E: KeyEq<K>,
{
    /// Create an empty instance of Avl with custom ordering and equality
    /// policies. `order` must be a strict total order consistent with
    /// `equal`.
    pub fn with_policies<S>(name: S, order: O, equal: E) -> Avl<K, V, O, E>
    where
        S: AsRef<str>,
    {
        Avl {
            name: name.as_ref().to_string(),
            root: Default::default(),
            n_count: Default::default(),
            order,
            equal,
        }
    }
}

/// Maintenance API.
impl<K, V, O, E> Avl<K, V, O, E>
where
    O: KeyOrder<K>,
    E: KeyEq<K>,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Avl instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Return the height of the tree, zero for an empty tree.
    #[inline]
    pub fn height(&self) -> usize {
        usize::from(height(self.root.as_ref().map(Deref::deref)))
    }

    /// Return quickly with basic statisics, depths are not collected.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, mem::size_of::<Node<K, V>>(), self.height())
    }

    /// Validate AVL tree with following rules:
    ///
    /// * Keys are in sort-order, as per the ordering policy.
    /// * Cached height of every node matches its children.
    /// * Height of left and right subtree differ by at most one.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, AvlError> {
        let root = self.root.as_ref().map(Deref::deref);
        let mut depths = Depth::new();
        if let Err(err) = self.validate_tree(root, None, None, 1, &mut depths) {
            debug!("{}: validate failed, {}", self.name, err);
            return Err(err);
        }
        let mut stats = self.stats();
        stats.set_depths(depths);
        debug!(
            "{}: validated {} entries, height {}",
            self.name, stats.entries, stats.height
        );
        Ok(stats)
    }
}

type Upsert<K, V> = (Box<Node<K, V>>, Option<V>);

type Remove<K, V> = (Option<Box<Node<K, V>>>, Result<V, AvlError>);

type Delmin<K, V> = (Option<Box<Node<K, V>>>, Box<Node<K, V>>);

/// Write operations on Avl instance.
impl<K, V, O, E> Avl<K, V, O, E>
where
    O: KeyOrder<K>,
    E: KeyEq<K>,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    /// Never fails.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let root = self.root.take();
        let (root, old_value) = self.do_insert(root, key, value);
        self.root = Some(root);
        if old_value.is_none() {
            self.n_count += 1;
        }
        old_value
    }

    /// Remove key from this instance and return its value. If key is
    /// not present return [`AvlError::KeyNotFound`], tree is left as is.
    pub fn remove(&mut self, key: &K) -> Result<V, AvlError> {
        let root = self.root.take();
        let (root, res) = self.do_remove(root, key);
        self.root = root;
        if res.is_ok() {
            self.n_count -= 1;
        }
        res
    }

    fn do_insert(&self, node: Option<Box<Node<K, V>>>, key: K, value: V) -> Upsert<K, V> {
        let mut node = match node {
            None => return (Node::new(key, value), None),
            Some(node) => node,
        };

        if self.equal.equal(&node.key, &key) {
            let old_value = mem::replace(&mut node.value, value);
            return (node, Some(old_value));
        }

        let old_value = if self.order.less(&key, &node.key) {
            let (left, o) = self.do_insert(node.left.take(), key, value);
            node.left = Some(left);
            o
        } else {
            let (right, o) = self.do_insert(node.right.take(), key, value);
            node.right = Some(right);
            o
        };
        (balance(node), old_value)
    }

    fn do_remove(&self, node: Option<Box<Node<K, V>>>, key: &K) -> Remove<K, V> {
        let mut node = match node {
            None => return (None, Err(AvlError::KeyNotFound)),
            Some(node) => node,
        };

        if self.equal.equal(&node.key, key) {
            let right = match node.right.take() {
                None => {
                    let Node { left, value, .. } = *node;
                    return (left, Ok(value));
                }
                Some(right) => right,
            };
            // replace with in-order successor, leftmost of right subtree.
            let (right, succ) = remove_min(right);
            node.right = right;
            let Node { key, value, .. } = *succ;
            node.key = key;
            let old_value = mem::replace(&mut node.value, value);
            return (Some(balance(node)), Ok(old_value));
        }

        let res = if self.order.less(key, &node.key) {
            let (left, res) = self.do_remove(node.left.take(), key);
            node.left = left;
            res
        } else {
            let (right, res) = self.do_remove(node.right.take(), key);
            node.right = right;
            res
        };
        (Some(balance(node)), res)
    }

    fn validate_tree<'a>(
        &self,
        node: Option<&'a Node<K, V>>,
        low: Option<&'a K>,
        high: Option<&'a K>,
        depth: usize,
        depths: &mut Depth,
    ) -> Result<u8, AvlError> {
        let node = match node {
            None => return Ok(0),
            Some(node) => node,
        };

        if let Some(low) = low {
            if !self.order.less(low, &node.key) {
                return Err(AvlError::SortError(depth));
            }
        }
        if let Some(high) = high {
            if !self.order.less(&node.key, high) {
                return Err(AvlError::SortError(depth));
            }
        }

        let (left, right) = (node.left_deref(), node.right_deref());
        if left.is_none() && right.is_none() {
            depths.sample(depth);
        }
        let key = Some(&node.key);
        let lh = self.validate_tree(left, low, key, depth + 1, depths)?;
        let rh = self.validate_tree(right, key, high, depth + 1, depths)?;

        let computed = lh.max(rh) + 1;
        if node.height != computed {
            let cached = node.height;
            return Err(AvlError::HeightMismatch { cached, computed });
        }
        let factor = rh as i8 - lh as i8;
        if factor.abs() > 1 {
            return Err(AvlError::Unbalanced(factor));
        }
        Ok(computed)
    }
}

/// Read operations on Avl instance.
impl<K, V, O, E> Avl<K, V, O, E>
where
    O: KeyOrder<K>,
    E: KeyEq<K>,
{
    /// Get the value for key.
    pub fn lookup(&self, key: &K) -> Result<V, AvlError>
    where
        V: Clone,
    {
        match self.find(key) {
            Some(node) => Ok(node.value.clone()),
            None => Err(AvlError::KeyNotFound),
        }
    }

    /// Check whether key is present in this index.
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Return a random entry from this index.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let mut nref = self.root.as_ref().map(Deref::deref)?;

        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = if rng.gen::<bool>() {
                nref.left_deref()
            } else {
                nref.right_deref()
            };
            match next {
                Some(next) if at_depth > 0 => {
                    at_depth -= 1;
                    nref = next;
                }
                _ => break Some((nref.key.clone(), nref.value.clone())),
            }
        }
    }

    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut node = self.root.as_ref().map(Deref::deref);
        while let Some(nref) = node {
            if self.equal.equal(&nref.key, key) {
                return Some(nref);
            }
            node = if self.order.less(key, &nref.key) {
                nref.left_deref()
            } else {
                nref.right_deref()
            };
        }
        None
    }

    /// Keys in sort order, test only.
    #[cfg(test)]
    pub(crate) fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        fn walk<K: Clone, V>(node: Option<&Node<K, V>>, acc: &mut Vec<K>) {
            if let Some(node) = node {
                walk(node.left_deref(), acc);
                acc.push(node.key.clone());
                walk(node.right_deref(), acc);
            }
        }
        let mut acc = Vec::with_capacity(self.n_count);
        walk(self.root.as_ref().map(Deref::deref), &mut acc);
        acc
    }
}

//--------- rebalancing routines ----------------

fn height<K, V>(node: Option<&Node<K, V>>) -> u8 {
    node.map_or(0, |node| node.height)
}

fn balance_factor<K, V>(node: Option<&Node<K, V>>) -> i8 {
    node.map_or(0, |node| node.balance_factor())
}

fn balance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.fix_height();
    match node.balance_factor() {
        2 => {
            // right-left case, straighten the right child first.
            if balance_factor(node.right_deref()) < 0 {
                node.right = node.right.take().map(rotate_right);
            }
            rotate_left(node)
        }
        -2 => {
            if balance_factor(node.left_deref()) > 0 {
                node.left = node.left.take().map(rotate_left);
            }
            rotate_right(node)
        }
        _ => node,
    }
}

// detach the leftmost node of the subtree, returning the rebalanced
// remainder and the detached node.
fn remove_min<K, V>(mut node: Box<Node<K, V>>) -> Delmin<K, V> {
    match node.left.take() {
        None => (node.right.take(), node),
        Some(left) => {
            let (left, min) = remove_min(left);
            node.left = left;
            (Some(balance(node)), min)
        }
    }
}

//              node                       x
//              /  \                      / \
//             /    \                    /   \
//          left     x               node     xr
//                  / \              /  \
//                xl   xr         left   xl
//
fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = match node.right.take() {
        Some(x) => x,
        None => panic!("rotate_left(): no right child ? Call the programmer"),
    };
    node.right = x.left.take();
    node.fix_height();
    x.left = Some(node);
    x.fix_height();
    x
}

//              node                       x
//              /  \                      / \
//             /    \                    /   \
//            x     right              xl     node
//           / \                              / \
//         xl   xr                          xr   right
//
fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = match node.left.take() {
        Some(x) => x,
        None => panic!("rotate_right(): no left child ? Call the programmer"),
    };
    node.left = x.right.take();
    node.fix_height();
    x.right = Some(node);
    x.fix_height();
    x
}

/// Node corresponds to a single entry in Avl instance.
#[derive(Clone)]
pub struct Node<K, V> {
    key: K,
    value: V,
    height: u8,                     // height of subtree rooted here, leaf is 1.
    left: Option<Box<Node<K, V>>>,  // store: left child
    right: Option<Box<Node<K, V>>>, // store: right child
}

// Primary operations on a single node.
impl<K, V> Node<K, V> {
    // CREATE operation
    fn new(key: K, value: V) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    fn fix_height(&mut self) {
        let (l, r) = (height(self.left_deref()), height(self.right_deref()));
        self.height = l.max(r) + 1;
    }

    #[inline]
    fn balance_factor(&self) -> i8 {
        height(self.right_deref()) as i8 - height(self.left_deref()) as i8
    }
}

/// Statistics on [`Avl`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Avl::stats`] method.
/// * To get full statisics via [`Avl::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    height: usize,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize, height: usize) -> Stats {
        Stats {
            entries,
            node_size,
            height,
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Avl`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Avl<k,V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use avl_index::Avl;
    /// let avl: Avl<u64,i128> = Avl::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 16 bytes
    /// // overhead is 24 bytes, height byte padded to alignment
    /// assert_eq!(avl.stats().node_size(), 48);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return height of the tree.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Return [`Depth`] statistics, available only from
    /// [`Avl::validate`] on a non-empty tree.
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}
