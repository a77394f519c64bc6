//! L-tree compression of a WOTS+ public key into a single leaf value.
//!
//! The `len` chain ends are folded pairwise with H, level by level. At a
//! level with an odd number of nodes the last node is carried up unchanged,
//! so the tree is unbalanced whenever `len` is not a power of two.

use crate::address::Address;
use crate::hash::h;
use crate::params::Params;

/// Compresses a WOTS+ public key into one n-byte leaf.
///
/// ltree(pk, SEED, ADRS) - RFC 8391 Algorithm 8
///
/// `adrs` must be an L-tree address; its height and index words are set
/// here for every H call.
pub fn ltree(params: &Params, mut pk: Vec<Vec<u8>>, pub_seed: &[u8], adrs: &Address) -> Vec<u8> {
    debug_assert!(!pk.is_empty(), "L-tree input must not be empty");

    let mut adrs = *adrs;
    let mut height = 0u32;
    adrs.set_tree_height(height);

    while pk.len() > 1 {
        let parents = pk.len() / 2;

        for i in 0..parents {
            adrs.set_tree_index(i as u32);
            pk[i] = h(params, pub_seed, &pk[2 * i], &pk[2 * i + 1], &adrs);
        }

        if pk.len() % 2 == 1 {
            let last = pk.len() - 1;
            pk.swap(parents, last);
            pk.truncate(parents + 1);
        } else {
            pk.truncate(parents);
        }

        height += 1;
        adrs.set_tree_height(height);
    }

    pk.pop().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::XMSS_SHA2_10_256;

    fn node(byte: u8) -> Vec<u8> {
        vec![byte; 32]
    }

    fn ltree_address() -> Address {
        Address::ltree(&Address::new(), 7)
    }

    #[test]
    fn test_single_node_is_identity() {
        let params = XMSS_SHA2_10_256;
        let pub_seed = node(0xAA);
        assert_eq!(ltree(&params, vec![node(1)], &pub_seed, &ltree_address()), node(1));
    }

    #[test]
    fn test_two_nodes() {
        let params = XMSS_SHA2_10_256;
        let pub_seed = node(0xAA);

        let mut adrs = ltree_address();
        adrs.set_tree_height(0);
        adrs.set_tree_index(0);
        let expected = h(&params, &pub_seed, &node(1), &node(2), &adrs);

        let root = ltree(&params, vec![node(1), node(2)], &pub_seed, &ltree_address());
        assert_eq!(root, expected);
    }

    #[test]
    fn test_odd_node_is_carried_up() {
        // 3 leaves: H(H(l0, l1) @ (0, 0), l2) @ (1, 0)
        let params = XMSS_SHA2_10_256;
        let pub_seed = node(0xAA);

        let mut adrs = ltree_address();
        adrs.set_tree_height(0);
        adrs.set_tree_index(0);
        let left = h(&params, &pub_seed, &node(1), &node(2), &adrs);
        adrs.set_tree_height(1);
        let expected = h(&params, &pub_seed, &left, &node(3), &adrs);

        let root = ltree(
            &params,
            vec![node(1), node(2), node(3)],
            &pub_seed,
            &ltree_address(),
        );
        assert_eq!(root, expected);
    }

    #[test]
    fn test_five_nodes() {
        // Level 0: a = H(l0, l1) @ (0, 0), b = H(l2, l3) @ (0, 1), carry l4
        // Level 1: c = H(a, b) @ (1, 0), carry l4
        // Level 2: root = H(c, l4) @ (2, 0)
        let params = XMSS_SHA2_10_256;
        let pub_seed = node(0x55);
        let leaves: Vec<Vec<u8>> = (1..=5).map(node).collect();

        let mut adrs = ltree_address();
        adrs.set_tree_height(0);
        adrs.set_tree_index(0);
        let a = h(&params, &pub_seed, &leaves[0], &leaves[1], &adrs);
        adrs.set_tree_index(1);
        let b = h(&params, &pub_seed, &leaves[2], &leaves[3], &adrs);
        adrs.set_tree_height(1);
        adrs.set_tree_index(0);
        let c = h(&params, &pub_seed, &a, &b, &adrs);
        adrs.set_tree_height(2);
        let expected = h(&params, &pub_seed, &c, &leaves[4], &adrs);

        assert_eq!(ltree(&params, leaves, &pub_seed, &ltree_address()), expected);
    }

    #[test]
    fn test_depends_on_ltree_address() {
        let params = XMSS_SHA2_10_256;
        let pub_seed = node(0xAA);
        let leaves: Vec<Vec<u8>> = (0..67).map(node).collect();

        let a = ltree(&params, leaves.clone(), &pub_seed, &Address::ltree(&Address::new(), 0));
        let b = ltree(&params, leaves, &pub_seed, &Address::ltree(&Address::new(), 1));
        assert_ne!(a, b);
        assert_eq!(a.len(), params.n);
    }
}
