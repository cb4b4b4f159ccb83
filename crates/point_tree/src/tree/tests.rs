use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::Status;
use crate::testing::{Key, TestOwner};

fn tree(owner: &TestOwner) -> PointTree<Key, String> {
	PointTree::new(owner).unwrap()
}

fn sorted_vectors(tree: &PointTree<Key, String>) -> Vec<Vec<Key>> {
	let mut vectors: Vec<_> = tree.all_points().into_iter().map(|(coordinates, _)| coordinates).collect();
	vectors.sort();
	vectors
}

#[test]
fn test_cardinality_limits_scenario() {
	let owner = TestOwner::new(&[2, 10], 100);
	let tree = tree(&owner);

	let first = tree.get_or_create(&owner, &["a", "x"]).unwrap();
	assert_eq!(first.status(), Status::NewlyCreated);

	let again = tree.get_or_create(&owner, &["a", "x"]).unwrap();
	assert_eq!(again.status(), Status::AlreadyExisted);
	assert!(Arc::ptr_eq(first.point().unwrap(), again.point().unwrap()));

	assert_eq!(tree.get_or_create(&owner, &["a", "y"]).unwrap().status(), Status::NewlyCreated);
	assert_eq!(tree.get_or_create(&owner, &["b", "x"]).unwrap().status(), Status::NewlyCreated);

	let rejected = tree.get_or_create(&owner, &["c", "x"]).unwrap();
	assert_eq!(rejected.status(), Status::DimensionCardinalityExceeded);
	assert_eq!(rejected.dimension(), Some(0));

	assert_eq!(tree.cardinality(&[]), Some(2));
	assert_eq!(tree.cardinality(&["a"]), Some(2));
	assert_eq!(tree.cardinality(&["b"]), Some(1));
	assert_eq!(owner.total_points(), 3);
}

#[test]
fn test_total_limit_scenario() {
	let owner = TestOwner::new(&[10, 10], 1);
	let tree = tree(&owner);

	assert_eq!(tree.get_or_create(&owner, &["a", "x"]).unwrap().status(), Status::NewlyCreated);

	let rejected = tree.get_or_create(&owner, &["a", "y"]).unwrap();
	assert_eq!(rejected.status(), Status::TotalCountExceeded);
	assert_eq!(rejected.dimension(), Some(1));

	assert_eq!(tree.root.created_count(), 1);
	let under_a = tree.root.child_level(&"a").unwrap();
	assert_eq!(under_a.created_count(), 1);
	assert_eq!(under_a.len(), 1);
	assert_eq!(sorted_vectors(&tree), vec![vec!["a", "x"]]);

	let fresh_branch = tree.get_or_create(&owner, &["b", "x"]).unwrap();
	assert_eq!(fresh_branch.status(), Status::TotalCountExceeded);
	assert_eq!(fresh_branch.dimension(), Some(0));
	assert_eq!(tree.root.created_count(), 1);
}

#[test]
fn test_get_never_mutates() {
	let owner = TestOwner::new(&[4, 4, 4], 100);
	let tree = tree(&owner);
	tree.get_or_create(&owner, &["a", "b", "c"]).unwrap();

	let missing = tree.get(&owner, &["a", "q", "c"]).unwrap();
	assert_eq!(missing.status(), Status::NotFoundNoCreate);
	assert_eq!(missing.dimension(), Some(1));

	assert_eq!(tree.root.created_count(), 1);
	assert_eq!(tree.cardinality(&["a"]), Some(1));
	assert_eq!(tree.cardinality(&["a", "q"]), None);
	assert_eq!(owner.total_points(), 1);
	assert_eq!(owner.factory_calls(), 1);

	let found = tree.get(&owner, &["a", "b", "c"]).unwrap();
	assert_eq!(found.status(), Status::AlreadyExisted);
	assert_eq!(found.point().unwrap().as_str(), "a/b/c");
}

#[test]
fn test_get_on_empty_tree_stops_at_root() {
	let owner = TestOwner::new(&[4, 4], 100);
	let tree = tree(&owner);

	assert_eq!(tree.get(&owner, &["a", "b"]).unwrap().dimension(), Some(0));
	assert!(tree.all_points().is_empty());
	assert_eq!(tree.cardinality(&[]), Some(0));
}

#[test]
fn test_wrong_vector_length_is_rejected_without_mutation() {
	let owner = TestOwner::new(&[4, 4], 100);
	let tree = tree(&owner);

	assert_eq!(
		tree.get_or_create(&owner, &["a"]).unwrap_err(),
		TreeError::DimensionMismatch { expected: 2, actual: 1 }
	);
	assert_eq!(
		tree.get(&owner, &["a", "b", "c"]).unwrap_err(),
		TreeError::DimensionMismatch { expected: 2, actual: 3 }
	);
	assert_eq!(tree.root.created_count(), 0);
	assert_eq!(owner.total_points(), 0);
}

#[test]
fn test_owner_with_other_dimension_count_is_rejected_without_mutation() {
	let owner = TestOwner::new(&[4, 4], 100);
	let tree = tree(&owner);
	let wider = TestOwner::new(&[4, 4, 4], 100);

	assert_eq!(
		tree.get_or_create(&wider, &["a", "b"]).unwrap_err(),
		TreeError::OwnerMismatch { expected: 2, actual: 3 }
	);
	assert_eq!(
		tree.get(&wider, &["a", "b", "c"]).unwrap_err(),
		TreeError::OwnerMismatch { expected: 2, actual: 3 }
	);
	assert_eq!(tree.root.created_count(), 0);
	assert_eq!(wider.total_points(), 0);
	assert_eq!(wider.factory_calls(), 0);

	assert!(tree.get_or_create(&owner, &["a", "b"]).unwrap().is_created());
	assert_eq!(sorted_vectors(&tree), vec![vec!["a", "b"]]);
}

#[test]
fn test_zero_dimension_owner_is_rejected() {
	let owner = TestOwner::new(&[], 100);
	assert_eq!(PointTree::<Key, String>::new(&owner).err(), Some(TreeError::NoDimensions));
}

#[test]
fn test_all_points_yields_root_to_leaf_vectors() {
	let owner = TestOwner::new(&[8, 8, 8], 100);
	let tree = tree(&owner);
	let vectors = [["a", "x", "1"], ["a", "x", "2"], ["a", "y", "1"], ["b", "x", "1"]];
	for coordinates in &vectors {
		tree.get_or_create(&owner, coordinates).unwrap();
	}

	let points = tree.all_points();
	assert_eq!(points.len(), vectors.len());
	for (coordinates, point) in &points {
		assert_eq!(coordinates.len(), tree.dimension_count());
		assert_eq!(point.as_str(), coordinates.join("/"));
	}
	assert_eq!(sorted_vectors(&tree), vectors.iter().map(|v| v.to_vec()).collect::<Vec<_>>());
}

#[test]
fn test_cardinality_rejects_full_length_path() {
	let owner = TestOwner::new(&[4, 4], 100);
	let tree = tree(&owner);
	tree.get_or_create(&owner, &["a", "x"]).unwrap();

	assert_eq!(tree.cardinality(&["a", "x"]), None);
}

const KEYS: [Key; 5] = ["a", "b", "c", "d", "e"];

proptest! {
	/// Any serial mix of lookups and creations keeps both bounds, leaks no
	/// reservation, and enumerates exactly the created vectors.
	#[test]
	fn prop_serial_operations_keep_bounds(
		ops in prop::collection::vec((0..KEYS.len(), 0..KEYS.len(), any::<bool>()), 0..64),
		root_limit in 0usize..4,
		leaf_limit in 0usize..4,
		total_limit in 0usize..10,
	) {
		let owner = TestOwner::new(&[root_limit, leaf_limit], total_limit);
		let tree = tree(&owner);
		let mut created = HashSet::new();

		for (a, b, create) in ops {
			let coordinates = vec![KEYS[a], KEYS[b]];
			let total_before = owner.total_points();
			let resolution = if create {
				tree.get_or_create(&owner, &coordinates).unwrap()
			} else {
				tree.get(&owner, &coordinates).unwrap()
			};

			if resolution.is_created() {
				prop_assert!(created.insert(coordinates.clone()));
			} else {
				prop_assert_eq!(owner.total_points(), total_before);
				prop_assert_eq!(resolution.is_found(), created.contains(&coordinates));
			}
		}

		let published: HashSet<Vec<Key>> = tree.all_points().into_iter().map(|(coordinates, _)| coordinates).collect();
		prop_assert_eq!(&published, &created);
		prop_assert!(published.len() <= total_limit);
		prop_assert_eq!(owner.total_points(), published.len());
		prop_assert!(tree.cardinality(&[]).unwrap() <= root_limit);
		prop_assert_eq!(tree.root.created_count(), tree.root.len());
		for key in KEYS {
			if let Some(level) = tree.root.child_level(&key) {
				prop_assert!(level.len() <= leaf_limit);
				prop_assert_eq!(level.created_count(), level.len());
			}
		}
	}
}
