use crate::error::CryptoError;
use crate::hash::hash_pair;
use settlement_types::Hash;

/// Binary Merkle tree over an ordered leaf vector, keccak256 internal
/// nodes, raw concatenation (`H(left ‖ right)`, no length prefix).
///
/// Odd-sized levels promote the unpaired last node **unchanged** to the
/// next level rather than duplicating it — this changes both the root and
/// the proof shape relative to the duplicate-last-leaf convention.
pub struct MerkleTree {
    leaves: Vec<Hash>,
    /// `levels[0]` is the leaf level, each subsequent level half (rounded
    /// up) the size of the one below; `levels.last()` is `[root]`.
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree from leaves. Fails if `leaves` is empty.
    pub fn from_leaves(leaves: &[Hash]) -> Result<Self, CryptoError> {
        if leaves.is_empty() {
            return Err(CryptoError::MerkleProofInvalid);
        }

        let mut levels = vec![leaves.to_vec()];
        while levels.last().unwrap().len() > 1 {
            levels.push(next_level(levels.last().unwrap()));
        }

        Ok(Self { leaves: leaves.to_vec(), levels })
    }

    pub fn root(&self) -> Hash {
        self.levels.last().unwrap()[0]
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Generate an inclusion proof for the leaf at `index`, leaf-to-root
    /// order.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaves.len() {
            return None;
        }

        let mut siblings = Vec::new();
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = idx ^ 1;
            if sibling_index < level.len() {
                siblings.push(level[sibling_index]);
            }
            idx >>= 1;
        }

        Some(MerkleProof { index, siblings })
    }

    pub fn verify_leaf(&self, index: usize, leaf: &Hash) -> bool {
        self.leaves.get(index).map(|l| l == leaf).unwrap_or(false)
    }
}

/// Reduce one level: pair adjacent nodes, promote an unpaired last node
/// unchanged.
fn next_level(level: &[Hash]) -> Vec<Hash> {
    let mut next = Vec::with_capacity(level.len().div_ceil(2));
    let mut chunks = level.chunks_exact(2);
    for pair in &mut chunks {
        next.push(hash_pair(&pair[0], &pair[1]));
    }
    if let [last] = chunks.remainder() {
        next.push(*last);
    }
    next
}

/// `computeRoot(leaves)`: requires a non-empty leaf vector; for a single
/// leaf the root is that leaf.
pub fn compute_root(leaves: &[Hash]) -> Result<Hash, CryptoError> {
    MerkleTree::from_leaves(leaves).map(|t| t.root())
}

/// `getTreeDepth(n)`: 0 for `n ≤ 1`, otherwise the number of halvings
/// (rounded up) required to reach 1.
pub fn tree_depth(n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let mut depth = 0;
    let mut size = n;
    while size > 1 {
        size = size.div_ceil(2);
        depth += 1;
    }
    depth
}

/// Merkle inclusion proof: a sibling list in leaf-to-root order plus the
/// leaf's index at the time the proof was generated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleProof {
    pub index: usize,
    pub siblings: Vec<Hash>,
}

impl MerkleProof {
    /// `verifyProof(leaf, root, proof)`. An empty proof with `index == 0`
    /// verifies iff `leaf == root` (single-leaf tree).
    pub fn verify(&self, leaf: &Hash, root: &Hash) -> bool {
        &self.compute_root(leaf) == root
    }

    pub fn compute_root(&self, leaf: &Hash) -> Hash {
        let mut current = *leaf;
        let mut index = self.index;

        for sibling in &self.siblings {
            current = if index & 1 == 0 {
                hash_pair(&current, sibling)
            } else {
                hash_pair(sibling, &current)
            };
            index >>= 1;
        }

        current
    }

    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<Hash> {
        (0..n).map(|i| Hash::compute(format!("leaf{i}").as_bytes())).collect()
    }

    #[test]
    fn test_compute_root_empty_fails() {
        assert!(compute_root(&[]).is_err());
    }

    #[test]
    fn test_compute_root_single_leaf_is_itself() {
        let l = leaves(1);
        assert_eq!(compute_root(&l).unwrap(), l[0]);

        let tree = MerkleTree::from_leaves(&l).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(proof.siblings.is_empty());
        assert!(proof.verify(&l[0], &tree.root()));
    }

    #[test]
    fn test_odd_level_promotes_unchanged() {
        let l = leaves(3);
        let expected = hash_pair(&hash_pair(&l[0], &l[1]), &l[2]);
        assert_eq!(compute_root(&l).unwrap(), expected);

        let tree = MerkleTree::from_leaves(&l).unwrap();
        let proof_c = tree.proof(2).unwrap();
        // c sits on the promoted path at the bottom level: no sibling there.
        assert_eq!(proof_c.siblings.len(), 1);
        assert!(proof_c.verify(&l[2], &tree.root()));
    }

    #[test]
    fn test_proof_roundtrip_power_of_two() {
        let l = leaves(8);
        let tree = MerkleTree::from_leaves(&l).unwrap();
        for (i, leaf) in l.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert!(proof.verify(leaf, &tree.root()));
            assert!(!proof.verify(&Hash::compute(b"wrong"), &tree.root()));
        }
    }

    #[test]
    fn test_proof_roundtrip_odd_sizes() {
        for n in 1..20 {
            let l = leaves(n);
            let tree = MerkleTree::from_leaves(&l).unwrap();
            for (i, leaf) in l.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                assert!(proof.verify(leaf, &tree.root()), "n={n} i={i}");
            }
        }
    }

    #[test]
    fn test_tree_depth() {
        assert_eq!(tree_depth(0), 0);
        assert_eq!(tree_depth(1), 0);
        assert_eq!(tree_depth(2), 1);
        assert_eq!(tree_depth(3), 2);
        assert_eq!(tree_depth(4), 2);
        assert_eq!(tree_depth(8), 3);
        assert_eq!(tree_depth(9), 4);
    }

    #[test]
    fn test_proof_out_of_bounds() {
        let l = leaves(4);
        let tree = MerkleTree::from_leaves(&l).unwrap();
        assert!(tree.proof(4).is_none());
    }

    #[test]
    fn test_deterministic() {
        let l = leaves(5);
        let t1 = MerkleTree::from_leaves(&l).unwrap();
        let t2 = MerkleTree::from_leaves(&l).unwrap();
        assert_eq!(t1.root(), t2.root());
        assert_eq!(t1.proof(3).unwrap().siblings, t2.proof(3).unwrap().siblings);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_proof_json_roundtrip() {
        let l = leaves(5);
        let tree = MerkleTree::from_leaves(&l).unwrap();
        let proof = tree.proof(3).unwrap();

        let encoded = serde_json::to_string(&proof).unwrap();
        let decoded: MerkleProof = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, proof);
        assert!(decoded.verify(&l[3], &tree.root()));
    }

    proptest::proptest! {
        // §8: ∀ leaves L, ∀ index i < |L|: verifyProof(L[i], computeRoot(L), generateProof(L, i)).
        #[test]
        fn prop_proof_verifies_for_any_leaf_set_and_index(
            raw_leaves in proptest::collection::vec(proptest::array::uniform32(proptest::prelude::any::<u8>()), 1..40),
            index_seed in proptest::prelude::any::<usize>(),
        ) {
            let leaves: Vec<Hash> = raw_leaves.into_iter().map(Hash::from_bytes).collect();
            let tree = MerkleTree::from_leaves(&leaves).unwrap();
            let index = index_seed % leaves.len();

            let proof = tree.proof(index).unwrap();
            proptest::prop_assert!(proof.verify(&leaves[index], &tree.root()));
            proptest::prop_assert!(proof.depth() <= tree_depth(leaves.len()));
        }

        // A proof built for one leaf must not verify a different one (barring hash collision).
        #[test]
        fn prop_proof_rejects_wrong_leaf(
            raw_leaves in proptest::collection::vec(proptest::array::uniform32(proptest::prelude::any::<u8>()), 2..40),
        ) {
            let leaves: Vec<Hash> = raw_leaves.into_iter().map(Hash::from_bytes).collect();
            let tree = MerkleTree::from_leaves(&leaves).unwrap();
            let proof = tree.proof(0).unwrap();
            let wrong = Hash::compute(b"definitely not a member leaf");
            proptest::prop_assert!(!proof.verify(&wrong, &tree.root()));
        }
    }
}
