#![allow(dead_code)]
use rand::rngs::StdRng;
use rand::SeedableRng;
use upgma::{
    parse_leaf_names, read_distance_table, Dendrogram, DistanceTable, MatrixSource, ParamBuilder, PartitionPolicy,
    Sequence, SequenceSimulator, UpgmaError, UpgmaParams,
};

pub type ClusterFn = fn(MatrixSource<f64>, ParamBuilder) -> Result<Dendrogram<f64>, UpgmaError>;

pub fn abcd_table() -> DistanceTable<f64> {
    DistanceTable::from_matrix(
        &["A", "B", "C", "D"],
        &[
            vec![0.0, 2.0, 4.0, 6.0],
            vec![2.0, 0.0, 4.0, 6.0],
            vec![4.0, 4.0, 0.0, 6.0],
            vec![6.0, 6.0, 6.0, 0.0],
        ],
    )
}

fn merges_of(tree: &Dendrogram<f64>) -> Vec<(f64, usize, usize)> {
    tree.merges()
        .iter()
        .map(|merge| (merge.distance, merge.left, merge.right))
        .collect()
}

fn assert_ultrametric(tree: &Dendrogram<f64>) {
    for node in tree.nodes() {
        for child in [node.left, node.right].into_iter().flatten() {
            assert!(tree.nodes()[child].height <= node.height + 1e-9);
        }
        assert!(node.branch_length_left >= 0.0 && node.branch_length_right >= 0.0);
    }
    let heights: Vec<f64> = tree.merges().iter().map(|m| m.distance / 2.0).collect();
    assert!(heights.windows(2).all(|pair| pair[0] <= pair[1] + 1e-12));
}

pub fn test_abcd_tree(cluster_fn: ClusterFn) {
    let table = abcd_table();
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!(vec![(2.0, 0, 1), (4.0, 2, 4), (6.0, 3, 5)], merges_of(&tree));
    assert_eq!("(D:3,(C:2,(A:1,B:1):1):1);", tree.to_newick(6));
    assert_eq!(4, tree.root_node().size);
    assert_eq!(3.0, tree.root_node().height);
}

pub fn test_three_taxa(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(
        &["A", "B", "C"],
        &[vec![0.0, 2.0, 4.0], vec![2.0, 0.0, 4.0], vec![4.0, 4.0, 0.0]],
    );
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!("(C:2,(A:1,B:1):1);", tree.to_newick(6));
}

pub fn test_two_taxa(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(&["A", "B"], &[vec![0.0, 0.3], vec![0.3, 0.0]]);
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!("(A:0.15,B:0.15);", tree.to_newick(6));
}

pub fn test_single_taxon(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(&["Solo"], &[vec![0.0]]);
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert!(tree.merges().is_empty());
    assert_eq!("Solo;", tree.to_newick(6));
}

pub fn test_ties_take_lowest_ids(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(
        &["A", "B", "C", "D"],
        &[
            vec![0.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0, 1.0],
            vec![1.0, 1.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0, 0.0],
        ],
    );
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!(vec![(1.0, 0, 1), (1.0, 2, 3), (1.0, 4, 5)], merges_of(&tree));
    assert_eq!("((A:0.5,B:0.5):0,(C:0.5,D:0.5):0);", tree.to_newick(6));
}

pub fn test_undefined_distances(cluster_fn: ClusterFn) {
    let table = DistanceTable {
        names: vec![String::from("A"), String::from("B"), String::from("C")],
        rows: vec![
            vec![Some(0.0), Some(0.2), None],
            vec![Some(0.2), Some(0.0), None],
            vec![None, None, Some(0.0)],
        ],
    };
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!("(C:500000,(A:0.1,B:0.1):499999.9);", tree.to_newick(6));

    let tree = cluster_fn(
        MatrixSource::from(&table),
        UpgmaParams::builder().undefined_distance(10.0),
    )
    .unwrap();
    assert_eq!("(C:5,(A:0.1,B:0.1):4.9);", tree.to_newick(6));
}

pub fn test_precision(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(
        &["A", "B", "C"],
        &[vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 2.0], vec![2.0, 2.0, 0.0]],
    );
    let params = UpgmaParams::builder().precision(2);
    let tree = cluster_fn(MatrixSource::from(&table), params).unwrap();
    assert_eq!("(C:1,(A:0.5,B:0.5):0.5);", tree.to_newick(2));
}

pub fn test_partition_policy_does_not_change_tree(cluster_fn: ClusterFn) {
    let sequences = simulated(23, 60, 1);
    let source = MatrixSource::from(&sequences);
    let first = cluster_fn(
        source,
        UpgmaParams::builder().partition(PartitionPolicy::RemainderFirst),
    )
    .unwrap();
    let last = cluster_fn(
        source,
        UpgmaParams::builder().partition(PartitionPolicy::RemainderLast),
    )
    .unwrap();
    assert_eq!(first.merges(), last.merges());
    assert_eq!(first.to_newick(6), last.to_newick(6));
}

pub fn test_sequences_match_their_table(cluster_fn: ClusterFn) {
    let sequences = vec![
        Sequence::new("Human", "ACGTACGTACGTACGTACGT"),
        Sequence::new("Chimp", "ACGTACGTACGTACGTACGA"),
        Sequence::new("Gorilla", "ACGTACGTACGAACGTACCA"),
        Sequence::new("Gap", "--------------------"),
        Sequence::new("Mouse", "TCGAACGTTCGTACGAACCA"),
    ];
    let table = DistanceTable::from_sequences(&sequences);
    let from_sequences =
        cluster_fn(MatrixSource::from(&sequences), UpgmaParams::builder()).unwrap();
    let from_table = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!(from_table.merges(), from_sequences.merges());
    assert_eq!((0, 1), {
        let first = from_sequences.merges()[0];
        (first.left, first.right)
    });
    // The all-gap sequence is undefined against everything, so it joins last
    let root = from_sequences.root_node();
    assert_eq!(Some(3), root.left);
}

pub fn test_simulated_tree_is_ultrametric(cluster_fn: ClusterFn) {
    let sequences = simulated(40, 80, 9);
    let tree = cluster_fn(MatrixSource::from(&sequences), UpgmaParams::builder()).unwrap();
    assert_eq!(39, tree.merges().len());
    assert_eq!(79, tree.nodes().len());
    assert_ultrametric(&tree);

    let mut names = parse_leaf_names(&tree.to_newick(6)).unwrap();
    names.sort();
    let mut expected: Vec<String> = sequences.iter().map(|seq| seq.name.clone()).collect();
    expected.sort();
    assert_eq!(expected, names);
}

pub fn test_names_reserved_by_newick(cluster_fn: ClusterFn) {
    let table: DistanceTable<f64> =
        read_distance_table("A(1) 0 1 2\nB,x 1 0 2\nC:3 2 2 0\n").unwrap();
    let result = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder());
    assert!(matches!(result, Err(UpgmaError::InvalidName(name)) if name == "A(1)"));
}

pub fn test_negative_zero_distance(cluster_fn: ClusterFn) {
    let table: DistanceTable<f64> = read_distance_table("A 0 -0\nB -0 0\n").unwrap();
    let tree = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder()).unwrap();
    assert_eq!("(A:0,B:0);", tree.to_newick(6));
}

pub fn test_empty_data(cluster_fn: ClusterFn) {
    let table: DistanceTable<f64> = DistanceTable {
        names: vec![],
        rows: vec![],
    };
    let result = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder());
    assert!(matches!(result, Err(UpgmaError::EmptyDataset)));
}

pub fn test_asymmetric_table(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(&["A", "B"], &[vec![0.0, 1.0], vec![2.0, 0.0]]);
    let result = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder());
    assert!(matches!(
        result,
        Err(UpgmaError::AsymmetricMatrix { row: 0, col: 1 })
    ));
}

pub fn test_non_finite_distance(cluster_fn: ClusterFn) {
    let table = DistanceTable::from_matrix(
        &["A", "B"],
        &[vec![0.0, f64::INFINITY], vec![f64::INFINITY, 0.0]],
    );
    let result = cluster_fn(MatrixSource::from(&table), UpgmaParams::builder());
    assert!(matches!(result, Err(UpgmaError::InvalidDistance(_))));
}

pub fn test_mismatched_sequence_lengths(cluster_fn: ClusterFn) {
    let sequences = vec![Sequence::new("A", "ACGT"), Sequence::new("B", "ACGTA")];
    let result = cluster_fn(MatrixSource::from(&sequences), UpgmaParams::builder());
    assert!(matches!(result, Err(UpgmaError::WrongDimension(_))));
}

pub fn simulated(n_sequences: usize, length: usize, seed: u64) -> Vec<Sequence> {
    let mut rng = StdRng::seed_from_u64(seed);
    SequenceSimulator::new(n_sequences, length)
        .gap_prob(0.05)
        .ambiguous_prob(0.02)
        .generate(&mut rng)
        .unwrap()
}
