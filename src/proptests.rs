//! Property-based tests for exact fractions and rational matrices.

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_traits::{One, Zero};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{Fraction, Matrix, MatrixQ};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    fn fraction() -> impl Strategy<Value = Fraction> {
        (small_int(), non_zero_int()).prop_map(|(n, d)| Fraction::new(n, d).unwrap())
    }

    fn grid(rows: usize, cols: usize) -> impl Strategy<Value = Vec<Vec<i64>>> {
        prop::collection::vec(prop::collection::vec(-6i64..=6i64, cols), rows)
    }

    fn square_pair() -> impl Strategy<Value = (MatrixQ, MatrixQ)> {
        (1usize..=4)
            .prop_flat_map(|n| (grid(n, n), grid(n, n)))
            .prop_map(|(a, b)| {
                (
                    MatrixQ::from_integers(a).unwrap(),
                    MatrixQ::from_integers(b).unwrap(),
                )
            })
    }

    fn square() -> impl Strategy<Value = MatrixQ> {
        (1usize..=5)
            .prop_flat_map(|n| grid(n, n))
            .prop_map(|a| MatrixQ::from_integers(a).unwrap())
    }

    fn system() -> impl Strategy<Value = MatrixQ> {
        (1usize..=4, 2usize..=5)
            .prop_flat_map(|(rows, cols)| grid(rows, cols))
            .prop_map(|a| MatrixQ::from_integers(a).unwrap())
    }

    fn split(system: &MatrixQ) -> (MatrixQ, Vec<Fraction>) {
        let unknowns = system.cols() - 1;
        let coefficients = MatrixQ::from_list(
            system
                .to_list()
                .into_iter()
                .map(|mut line| {
                    line.truncate(unknowns);
                    line
                })
                .collect(),
        )
        .unwrap();
        let rhs = (0..system.rows())
            .map(|r| system.at(r, unknowns).clone())
            .collect();
        (coefficients, rhs)
    }

    proptest! {
        // Fraction

        #[test]
        fn fraction_reduction_invariance(a in small_int(), b in non_zero_int(), c in 1i64..100i64) {
            let scaled = Fraction::new(a * c, b * c).unwrap();
            prop_assert_eq!(&scaled, &Fraction::new(a, b).unwrap());
            prop_assert!(*scaled.denom() > BigInt::zero());
        }

        #[test]
        fn fraction_additive_inverse(x in fraction()) {
            prop_assert_eq!(&x + &(-&x), Fraction::zero());
            prop_assert!((&x - &x).is_zero());
        }

        #[test]
        fn fraction_reciprocal(x in fraction()) {
            prop_assume!(!x.is_zero());
            prop_assert_eq!(&x * &x.recip().unwrap(), Fraction::one());
        }

        #[test]
        fn fraction_display_parse_roundtrip(x in fraction()) {
            prop_assert_eq!(Fraction::parse(&x.to_string()).unwrap(), x);
        }

        #[test]
        fn fraction_order_matches_f64(x in fraction(), y in fraction()) {
            if x < y {
                prop_assert!(x.to_f64().unwrap() <= y.to_f64().unwrap());
            }
        }

        // Matrix

        #[test]
        fn rref_is_idempotent(a in system()) {
            let rref = a.gaussian_elimination();
            prop_assert!(rref.is_rref());
            prop_assert_eq!(rref.gaussian_elimination(), rref);
        }

        #[test]
        fn determinant_is_multiplicative((a, b) in square_pair()) {
            let product = (&a * &b).unwrap();
            prop_assert_eq!(
                product.find_determinant().unwrap(),
                &(a.find_determinant().unwrap() * b.find_determinant().unwrap())
            );
        }

        #[test]
        fn determinant_of_transpose(a in square()) {
            prop_assert_eq!(a.transpose().find_determinant(), a.find_determinant());
        }

        #[test]
        fn inverse_is_two_sided(a in square()) {
            let identity = MatrixQ::identity(a.rows()).unwrap();
            match a.find_inverse() {
                Some(inverse) => {
                    prop_assert_eq!((&a * inverse).unwrap(), identity.clone());
                    prop_assert_eq!((inverse * &a).unwrap(), identity);
                }
                None => prop_assert!(a.find_determinant().unwrap().is_zero()),
            }
        }

        #[test]
        fn inverse_matches_adjoint(a in square()) {
            let det = a.find_determinant().unwrap().clone();
            prop_assume!(!det.is_zero());
            let expected = a.adjoint_matrix().unwrap().scale(det.recip().unwrap());
            prop_assert_eq!(a.find_inverse().unwrap(), &expected);
        }

        #[test]
        fn solutions_satisfy_system(a in system(), seeds in prop::collection::vec(fraction(), 4)) {
            let (coefficients, rhs) = split(&a);
            let solution = a.find_solution();
            if !solution.is_consistent() {
                prop_assert!(a.output_solution().is_none());
                return Ok(());
            }

            let params: Vec<Fraction> = (0..solution.free_variables().len())
                .map(|i| seeds[i % seeds.len()].clone())
                .collect();
            let x = solution.evaluate(&params).unwrap();
            prop_assert_eq!(coefficients.mul_vector(&x).unwrap(), rhs);
        }
    }

    #[test]
    fn test_random_products_match_naive() {
        init_logger();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..20 {
            let (n, k, m) = (
                rng.gen_range(1..=6),
                rng.gen_range(1..=6),
                rng.gen_range(1..=6),
            );
            let mut random = |rows: usize, cols: usize| {
                MatrixQ::from_list(
                    (0..rows)
                        .map(|_| {
                            (0..cols)
                                .map(|_| {
                                    Fraction::new(rng.gen_range(-20i64..=20), rng.gen_range(1i64..=9))
                                        .unwrap()
                                })
                                .collect()
                        })
                        .collect(),
                )
                .unwrap()
            };
            let a = random(n, k);
            let b = random(k, m);

            let product = (&a * &b).unwrap();
            for i in 0..n {
                for j in 0..m {
                    let expected: Fraction = (0..k).map(|l| a.at(i, l) * b.at(l, j)).sum();
                    assert_eq!(product.at(i, j), &expected);
                }
            }
        }
    }

    #[test]
    fn test_random_systems_with_known_solution() {
        init_logger();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let n: usize = rng.gen_range(1..=5);
            let a = MatrixQ::from_integers(
                (0..n)
                    .map(|_| (0..n).map(|_| rng.gen_range(-9..=9)).collect())
                    .collect(),
            )
            .unwrap();
            let x: Vec<Fraction> = (0..n)
                .map(|_| Fraction::new(rng.gen_range(-9i64..=9), rng.gen_range(1i64..=4)).unwrap())
                .collect();
            let b = MatrixQ::from_list(a.mul_vector(&x).unwrap().into_iter().map(|v| vec![v]).collect())
                .unwrap();
            let system = a.augment(&b).unwrap();

            if a.find_determinant().unwrap().is_zero() {
                assert!(system.find_solution().is_consistent());
            } else {
                assert_eq!(system.find_solution().constants(), Some(&x[..]));
                assert!(system.find_solution().is_unique());
            }
        }
    }
}
