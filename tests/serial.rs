use upgma::{Dendrogram, MatrixSource, ParamBuilder, Upgma, UpgmaError};

mod common;

macro_rules! define_serial_test {
    ($test_fn:ident) => {
        #[test]
        fn $test_fn() {
            fn cluster_fn(
                source: MatrixSource<f64>,
                params: ParamBuilder,
            ) -> Result<Dendrogram<f64>, UpgmaError> {
                Upgma::new(source, params.build()).cluster()
            }

            common::$test_fn(cluster_fn);
        }
    };
}

define_serial_test!(test_abcd_tree);
define_serial_test!(test_three_taxa);
define_serial_test!(test_two_taxa);
define_serial_test!(test_single_taxon);
define_serial_test!(test_ties_take_lowest_ids);
define_serial_test!(test_undefined_distances);
define_serial_test!(test_precision);
define_serial_test!(test_partition_policy_does_not_change_tree);
define_serial_test!(test_sequences_match_their_table);
define_serial_test!(test_simulated_tree_is_ultrametric);
define_serial_test!(test_names_reserved_by_newick);
define_serial_test!(test_negative_zero_distance);
define_serial_test!(test_empty_data);
define_serial_test!(test_asymmetric_table);
define_serial_test!(test_non_finite_distance);
define_serial_test!(test_mismatched_sequence_lengths);
