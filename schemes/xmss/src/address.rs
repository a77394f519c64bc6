//! Address (ADRS) structure for XMSS domain separation.
//!
//! The ADRS structure is a 32-byte value mixed into every keyed hash call so
//! that no two calls in a key's lifetime share an input domain.
//!
//! # Structure (RFC 8391 Section 2.5)
//!
//! ```text
//! Word  OTS            L-tree          Hash tree
//! 0     layer          layer           layer
//! 1-2   tree           tree            tree
//! 3     type = 0       type = 1        type = 2
//! 4     OTS address    L-tree address  padding = 0
//! 5     chain address  tree height     tree height
//! 6     hash address   tree index      tree index
//! 7     keyAndMask     keyAndMask      keyAndMask
//! ```
//!
//! All words are big-endian. `set_type` only writes word 3; the typed
//! constructors are the way to switch an address to a new type, since they
//! zero every type-specific word.

/// Address types for XMSS (RFC 8391 Section 2.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum AddressType {
    /// WOTS+ chain hashing
    Ots = 0,
    /// L-tree compression of a WOTS+ public key
    LTree = 1,
    /// Internal Merkle tree nodes
    HashTree = 2,
}

/// ADRS structure (32 bytes) for domain separation in XMSS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Address {
    /// Raw 32-byte address data
    data: [u8; 32],
}

impl Address {
    /// Creates a new zeroed address.
    pub fn new() -> Self {
        Address { data: [0u8; 32] }
    }

    /// OTS address of leaf `keypair` inside `subtree`; all other fields zero.
    pub fn ots(subtree: &Address, keypair: u32) -> Self {
        let mut addr = Self::inherit(subtree, AddressType::Ots);
        addr.set_ots(keypair);
        addr
    }

    /// L-tree address of leaf `leaf` inside `subtree`; all other fields zero.
    pub fn ltree(subtree: &Address, leaf: u32) -> Self {
        let mut addr = Self::inherit(subtree, AddressType::LTree);
        addr.set_ltree(leaf);
        addr
    }

    /// Hash-tree address inside `subtree`; all other fields zero.
    pub fn hash_tree(subtree: &Address) -> Self {
        Self::inherit(subtree, AddressType::HashTree)
    }

    fn inherit(subtree: &Address, addr_type: AddressType) -> Self {
        let mut addr = Address::new();
        addr.data[0..12].copy_from_slice(&subtree.data[0..12]);
        addr.set_type(addr_type);
        addr
    }

    #[inline]
    fn set_word(&mut self, word: usize, value: u32) {
        self.data[4 * word..4 * word + 4].copy_from_slice(&value.to_be_bytes());
    }

    #[inline]
    fn word(&self, word: usize) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.data[4 * word..4 * word + 4]);
        u32::from_be_bytes(bytes)
    }

    /// Sets the layer address (word 0).
    #[inline]
    pub fn set_layer(&mut self, layer: u32) {
        self.set_word(0, layer);
    }

    /// Gets the layer address.
    #[inline]
    pub fn layer(&self) -> u32 {
        self.word(0)
    }

    /// Sets the 64-bit tree address (words 1-2).
    #[inline]
    pub fn set_tree(&mut self, tree: u64) {
        self.data[4..12].copy_from_slice(&tree.to_be_bytes());
    }

    /// Gets the tree address.
    #[inline]
    pub fn tree(&self) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.data[4..12]);
        u64::from_be_bytes(bytes)
    }

    /// Sets the address type (word 3). Type-specific words are left untouched.
    #[inline]
    pub fn set_type(&mut self, addr_type: AddressType) {
        self.set_word(3, addr_type as u32);
    }

    /// Gets the raw address type.
    #[inline]
    pub fn addr_type(&self) -> u32 {
        self.word(3)
    }

    // ========================================================================
    // OTS fields
    // ========================================================================

    /// Sets the OTS address (word 4): the leaf whose WOTS+ key is in use.
    #[inline]
    pub fn set_ots(&mut self, ots: u32) {
        self.set_word(4, ots);
    }

    /// Gets the OTS address.
    #[inline]
    pub fn ots_index(&self) -> u32 {
        self.word(4)
    }

    /// Sets the chain address (word 5).
    #[inline]
    pub fn set_chain(&mut self, chain: u32) {
        self.set_word(5, chain);
    }

    /// Gets the chain address.
    #[inline]
    pub fn chain(&self) -> u32 {
        self.word(5)
    }

    /// Sets the hash address (word 6): the position within the chain.
    #[inline]
    pub fn set_hash(&mut self, hash: u32) {
        self.set_word(6, hash);
    }

    /// Gets the hash address.
    #[inline]
    pub fn hash(&self) -> u32 {
        self.word(6)
    }

    // ========================================================================
    // L-tree / hash-tree fields
    // ========================================================================

    /// Sets the L-tree address (word 4).
    #[inline]
    pub fn set_ltree(&mut self, ltree: u32) {
        self.set_word(4, ltree);
    }

    /// Gets the L-tree address.
    #[inline]
    pub fn ltree_index(&self) -> u32 {
        self.word(4)
    }

    /// Sets the tree height (word 5).
    #[inline]
    pub fn set_tree_height(&mut self, height: u32) {
        self.set_word(5, height);
    }

    /// Gets the tree height.
    #[inline]
    pub fn tree_height(&self) -> u32 {
        self.word(5)
    }

    /// Sets the tree index (word 6).
    #[inline]
    pub fn set_tree_index(&mut self, index: u32) {
        self.set_word(6, index);
    }

    /// Gets the tree index.
    #[inline]
    pub fn tree_index(&self) -> u32 {
        self.word(6)
    }

    /// Sets the key-and-mask selector (word 7).
    #[inline]
    pub fn set_key_and_mask(&mut self, key_and_mask: u32) {
        self.set_word(7, key_and_mask);
    }

    /// Gets the key-and-mask selector.
    #[inline]
    pub fn key_and_mask(&self) -> u32 {
        self.word(7)
    }

    /// Returns the address as a 32-byte array for use in hash functions.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.data
    }

    /// Returns a reference to the internal byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.data
    }
}
