//! Merkle tree construction and authentication path replay.
//!
//! The tree over the 2^h L-tree leaves is built with the stack-based
//! treehash algorithm: leaves are consumed in ascending index order and the
//! two topmost stack entries are merged whenever they share a height. The
//! stack never holds more than h + 1 nodes, so memory stays O(h · n) while
//! the leaves themselves are generated in parallel.
//!
//! # Authentication paths
//!
//! While building the tree, every node that is a sibling of the path from the
//! target leaf to the root is copied out. `compute_root` replays such a path
//! from a leaf and is the verifier side of the same computation.

use rayon::prelude::*;
use zeroize::Zeroize;

use crate::address::Address;
use crate::hash::{h, prf};
use crate::ltree::ltree;
use crate::params::Params;
use crate::wots::wots_pk_gen;

/// Number of leaves generated in parallel before they are merged.
const LEAF_BATCH: u32 = 256;

/// Fixed-capacity stack of tree nodes with their heights.
struct NodeStack {
    nodes: Vec<Vec<u8>>,
    heights: Vec<u32>,
    top: usize,
}

impl NodeStack {
    fn with_capacity(capacity: usize) -> Self {
        NodeStack {
            nodes: vec![Vec::new(); capacity],
            heights: vec![0; capacity],
            top: 0,
        }
    }

    fn push(&mut self, node: Vec<u8>, height: u32) {
        assert!(self.top < self.nodes.len(), "treehash stack overflow");
        self.nodes[self.top] = node;
        self.heights[self.top] = height;
        self.top += 1;
    }

    /// Height shared by the two topmost entries, if they can be merged.
    fn mergeable_height(&self) -> Option<u32> {
        if self.top >= 2 && self.heights[self.top - 1] == self.heights[self.top - 2] {
            Some(self.heights[self.top - 1])
        } else {
            None
        }
    }

    /// Pops the two topmost entries as (left, right).
    fn pop_pair(&mut self) -> (Vec<u8>, Vec<u8>) {
        self.top -= 2;
        let left = std::mem::take(&mut self.nodes[self.top]);
        let right = std::mem::take(&mut self.nodes[self.top + 1]);
        (left, right)
    }

    fn len(&self) -> usize {
        self.top
    }

    fn into_root(mut self) -> Vec<u8> {
        std::mem::take(&mut self.nodes[0])
    }
}

/// Computes the OTS seed of leaf `index`.
///
/// seed = PRF(prvSeed, ADRS) with ADRS the leaf's OTS address and the chain,
/// hash and keyAndMask words zero.
pub fn leaf_seed(params: &Params, prv_seed: &[u8], subtree: &Address, index: u32) -> Vec<u8> {
    prf(params, prv_seed, Address::ots(subtree, index).as_bytes())
}

/// Generates the leaf at `index`: the L-tree compression of its WOTS+ public key.
pub fn gen_leaf(
    params: &Params,
    prv_seed: &[u8],
    pub_seed: &[u8],
    subtree: &Address,
    index: u32,
) -> Vec<u8> {
    let mut seed = leaf_seed(params, prv_seed, subtree, index);
    let mut ots_adrs = Address::ots(subtree, index);
    let pk = wots_pk_gen(params, &seed, pub_seed, &mut ots_adrs);
    seed.zeroize();

    ltree(params, pk, pub_seed, &Address::ltree(subtree, index))
}

/// Yields all 2^h leaves in index order, generating each batch in parallel.
pub fn leaves<'a>(
    params: &'a Params,
    prv_seed: &'a [u8],
    pub_seed: &'a [u8],
    subtree: &'a Address,
) -> impl Iterator<Item = Vec<u8>> + 'a {
    let total = 1u32 << params.h;

    (0..total).step_by(LEAF_BATCH as usize).flat_map(move |start| {
        let end = start.saturating_add(LEAF_BATCH).min(total);
        (start..end)
            .into_par_iter()
            .map(|i| gen_leaf(params, prv_seed, pub_seed, subtree, i))
            .collect::<Vec<_>>()
    })
}

/// Runs treehash over an ordered source of leaves.
///
/// Returns the root and the authentication path of leaf `target`. `leaves`
/// must yield exactly 2^h nodes in ascending index order.
pub fn treehash<I>(
    params: &Params,
    pub_seed: &[u8],
    subtree: &Address,
    target: u32,
    leaves: I,
) -> (Vec<u8>, Vec<Vec<u8>>)
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let mut auth = vec![Vec::new(); params.h];
    let mut stack = NodeStack::with_capacity(params.h + 1);
    let mut adrs = Address::hash_tree(subtree);

    for (i, leaf) in leaves.into_iter().enumerate() {
        let i = i as u32;

        if params.h > 0 && i == target ^ 1 {
            auth[0] = leaf.clone();
        }
        stack.push(leaf, 0);

        while let Some(height) = stack.mergeable_height() {
            adrs.set_tree_height(height);
            adrs.set_tree_index(i >> (height + 1));

            let (left, right) = stack.pop_pair();
            let node = h(params, pub_seed, &left, &right, &adrs);

            let parent = height + 1;
            if (parent as usize) < params.h && ((target >> parent) ^ 1) == i >> parent {
                auth[parent as usize] = node.clone();
            }
            stack.push(node, parent);
        }
    }

    debug_assert_eq!(stack.len(), 1, "treehash needs exactly 2^h leaves");
    (stack.into_root(), auth)
}

/// Builds the full tree of a key and returns its root and the path of `target`.
pub fn build_tree(
    params: &Params,
    prv_seed: &[u8],
    pub_seed: &[u8],
    subtree: &Address,
    target: u32,
) -> (Vec<u8>, Vec<Vec<u8>>) {
    treehash(
        params,
        pub_seed,
        subtree,
        target,
        leaves(params, prv_seed, pub_seed, subtree),
    )
}

/// Recomputes the root from a leaf and its authentication path.
///
/// At height k the node is the left child when bit k of `index` is 0.
pub fn compute_root(
    params: &Params,
    leaf: &[u8],
    index: u32,
    auth: &[Vec<u8>],
    pub_seed: &[u8],
    subtree: &Address,
) -> Vec<u8> {
    let mut adrs = Address::hash_tree(subtree);
    let mut node = leaf.to_vec();

    for (k, sibling) in auth.iter().enumerate() {
        adrs.set_tree_height(k as u32);
        adrs.set_tree_index(index >> (k + 1));

        node = if (index >> k) & 1 == 0 {
            h(params, pub_seed, &node, sibling, &adrs)
        } else {
            h(params, pub_seed, sibling, &node, &adrs)
        };
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XMSS_TEST_4_256;

    fn synthetic_leaves(params: &Params) -> Vec<Vec<u8>> {
        (0..1u32 << params.h)
            .map(|i| {
                let mut leaf = vec![0u8; params.n];
                leaf[..4].copy_from_slice(&i.to_be_bytes());
                leaf[params.n - 1] = 0x5A;
                leaf
            })
            .collect()
    }

    fn naive_node(
        params: &Params,
        leaves: &[Vec<u8>],
        pub_seed: &[u8],
        height: u32,
        index: u32,
    ) -> Vec<u8> {
        if height == 0 {
            return leaves[index as usize].clone();
        }
        let left = naive_node(params, leaves, pub_seed, height - 1, 2 * index);
        let right = naive_node(params, leaves, pub_seed, height - 1, 2 * index + 1);

        let mut adrs = Address::hash_tree(&Address::new());
        adrs.set_tree_height(height - 1);
        adrs.set_tree_index(index);
        h(params, pub_seed, &left, &right, &adrs)
    }

    #[test]
    fn test_root_matches_recursive_tree() {
        let params = XMSS_TEST_4_256;
        let pub_seed = vec![3u8; params.n];
        let leaves = synthetic_leaves(&params);

        let (root, _) = treehash(&params, &pub_seed, &Address::new(), 0, leaves.clone());
        let expected = naive_node(&params, &leaves, &pub_seed, params.h as u32, 0);

        assert_eq!(root, expected);
    }

    #[test]
    fn test_auth_path_matches_recursive_siblings() {
        let params = XMSS_TEST_4_256;
        let pub_seed = vec![3u8; params.n];
        let leaves = synthetic_leaves(&params);
        let target = 11u32;

        let (_, auth) = treehash(&params, &pub_seed, &Address::new(), target, leaves.clone());

        assert_eq!(auth.len(), params.h);
        for (k, node) in auth.iter().enumerate() {
            let sibling = (target >> k) ^ 1;
            assert_eq!(node, &naive_node(&params, &leaves, &pub_seed, k as u32, sibling));
        }
    }

    #[test]
    fn test_compute_root_inverts_treehash_for_every_leaf() {
        let params = XMSS_TEST_4_256;
        let pub_seed = vec![9u8; params.n];
        let leaves = synthetic_leaves(&params);

        for target in 0..1u32 << params.h {
            let (root, auth) =
                treehash(&params, &pub_seed, &Address::new(), target, leaves.clone());
            let replayed = compute_root(
                &params,
                &leaves[target as usize],
                target,
                &auth,
                &pub_seed,
                &Address::new(),
            );
            assert_eq!(replayed, root, "target {}", target);
        }
    }

    #[test]
    fn test_compute_root_wrong_index_differs() {
        let params = XMSS_TEST_4_256;
        let pub_seed = vec![9u8; params.n];
        let leaves = synthetic_leaves(&params);

        let (root, auth) = treehash(&params, &pub_seed, &Address::new(), 6, leaves.clone());
        let replayed = compute_root(&params, &leaves[6], 7, &auth, &pub_seed, &Address::new());
        assert_ne!(replayed, root);
    }

    #[test]
    fn test_subtree_address_separates_trees() {
        let params = XMSS_TEST_4_256;
        let pub_seed = vec![9u8; params.n];
        let leaves = synthetic_leaves(&params);
        let mut other = Address::new();
        other.set_tree(1);

        let (a, _) = treehash(&params, &pub_seed, &Address::new(), 0, leaves.clone());
        let (b, _) = treehash(&params, &pub_seed, &other, 0, leaves);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parallel_leaves_are_ordered() {
        let params = XMSS_TEST_4_256;
        let prv_seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];
        let subtree = Address::new();

        let parallel: Vec<Vec<u8>> = leaves(&params, &prv_seed, &pub_seed, &subtree).collect();
        let sequential: Vec<Vec<u8>> = (0..1u32 << params.h)
            .map(|i| gen_leaf(&params, &prv_seed, &pub_seed, &subtree, i))
            .collect();

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_build_tree_paths_verify() {
        let params = XMSS_TEST_4_256;
        let prv_seed = vec![1u8; params.n];
        let pub_seed = vec![2u8; params.n];
        let subtree = Address::new();

        let (root, _) = build_tree(&params, &prv_seed, &pub_seed, &subtree, 0);
        for target in [0u32, 5, 15] {
            let (r, auth) = build_tree(&params, &prv_seed, &pub_seed, &subtree, target);
            let leaf = gen_leaf(&params, &prv_seed, &pub_seed, &subtree, target);
            assert_eq!(r, root);
            assert_eq!(
                compute_root(&params, &leaf, target, &auth, &pub_seed, &subtree),
                root
            );
        }
    }

    #[test]
    fn test_leaf_seed_differs_per_leaf() {
        let params = XMSS_TEST_4_256;
        let prv_seed = vec![1u8; params.n];

        let a = leaf_seed(&params, &prv_seed, &Address::new(), 0);
        let b = leaf_seed(&params, &prv_seed, &Address::new(), 1);
        assert_ne!(a, b);
        assert_eq!(a.len(), params.n);
    }
}
