use rand::prelude::*;

/// Generates a random dense weight matrix with `n` nodes
///
/// Every off-diagonal entry becomes an edge with probability `density`, weighted
/// uniformly in `[1, max_weight)`. Absent edges and the diagonal are zero.
pub fn random_dense_matrix<R: Rng + ?Sized>(
    n: usize,
    density: f64,
    max_weight: f64,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    let density = density.clamp(0.0, 1.0);
    let max_weight = max_weight.max(1.0 + f64::EPSILON);

    let mut matrix = vec![vec![0.0; n]; n];
    for (u, row) in matrix.iter_mut().enumerate() {
        for (v, entry) in row.iter_mut().enumerate() {
            if u != v && rng.gen_bool(density) {
                *entry = rng.gen_range(1.0..max_weight);
            }
        }
    }
    matrix
}

/// Same as [`random_dense_matrix`] with a reproducible seed
pub fn seeded_dense_matrix(n: usize, density: f64, max_weight: f64, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_dense_matrix(n, density, max_weight, &mut rng)
}

/// A directed chain `0 -> 1 -> ... -> n-1` with uniform weight
pub fn chain_matrix(n: usize, weight: f64) -> Vec<Vec<f64>> {
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 1..n {
        matrix[i - 1][i] = weight;
    }
    matrix
}

/// A complete directed graph without self-loops, uniform weight
pub fn complete_matrix(n: usize, weight: f64) -> Vec<Vec<f64>> {
    (0..n)
        .map(|u| (0..n).map(|v| if u == v { 0.0 } else { weight }).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_matrices_are_reproducible() {
        let a = seeded_dense_matrix(20, 0.3, 10.0, 7);
        let b = seeded_dense_matrix(20, 0.3, 10.0, 7);
        assert_eq!(a, b);
        assert!(a.iter().enumerate().all(|(i, row)| row[i] == 0.0));
        assert!(a.iter().flatten().all(|&w| w == 0.0 || (1.0..10.0).contains(&w)));
    }

    #[test]
    fn chain_and_complete_shapes() {
        let chain = chain_matrix(3, 2.0);
        assert_eq!(chain, vec![vec![0.0, 2.0, 0.0], vec![0.0, 0.0, 2.0], vec![0.0, 0.0, 0.0]]);

        let complete = complete_matrix(3, 1.0);
        assert_eq!(complete.iter().flatten().filter(|&&w| w > 0.0).count(), 6);
    }
}
