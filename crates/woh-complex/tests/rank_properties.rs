use proptest::prelude::*;
use woh_complex::{rank, MatrixEntry, OperatorMatrix, DEFAULT_PRIMES};

fn sparse_matrix() -> impl Strategy<Value = OperatorMatrix> {
    (1usize..8, 1usize..8).prop_flat_map(|(rows, cols)| {
        prop::collection::vec((0..rows, 0..cols, -3i64..=3), 0..24).prop_map(move |cells| {
            OperatorMatrix::new(
                rows,
                cols,
                cells.into_iter().map(|(domain, target, coefficient)| MatrixEntry {
                    domain,
                    target,
                    coefficient,
                }),
            )
            .unwrap()
        })
    })
}

fn stacked(matrix: &OperatorMatrix) -> OperatorMatrix {
    let rows = matrix.domain_dim();
    let copies = matrix.entries().iter().flat_map(|entry| {
        [
            *entry,
            MatrixEntry {
                domain: entry.domain + rows,
                ..*entry
            },
        ]
    });
    OperatorMatrix::new(2 * rows, matrix.target_dim(), copies).unwrap()
}

proptest! {
    #[test]
    fn rank_is_bounded_by_the_shape(matrix in sparse_matrix()) {
        let r = rank(&matrix, &DEFAULT_PRIMES).unwrap();
        prop_assert!(r <= matrix.domain_dim().min(matrix.target_dim()));
        prop_assert_eq!(r == 0, matrix.is_zero());
    }

    #[test]
    fn repeated_rows_add_no_rank(matrix in sparse_matrix()) {
        prop_assert_eq!(
            rank(&stacked(&matrix), &DEFAULT_PRIMES).unwrap(),
            rank(&matrix, &DEFAULT_PRIMES).unwrap()
        );
    }

    #[test]
    fn entries_stay_sorted_and_non_zero(matrix in sparse_matrix()) {
        prop_assert!(matrix.entries().iter().all(|entry| entry.coefficient != 0));
        prop_assert!(matrix
            .entries()
            .windows(2)
            .all(|pair| (pair[0].domain, pair[0].target) < (pair[1].domain, pair[1].target)));
    }
}
