//! Average-linkage agglomerative clustering for the nullity dendrogram.

/// One merge step. Leaves are `0..n`; the cluster created by merge `k` has id
/// `n + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

/// Merge the closest pair of clusters until one remains. Ties go to the pair
/// found first, which keeps the result deterministic.
pub fn average_linkage(dist: &[Vec<f64>]) -> Vec<Merge> {
    let n = dist.len();
    let mut active: Vec<(usize, Vec<usize>)> = (0..n).map(|i| (i, vec![i])).collect();
    let mut merges = Vec::with_capacity(n.saturating_sub(1));

    while active.len() > 1 {
        let mut best = (0, 1, f64::INFINITY);
        for i in 0..active.len() {
            for j in (i + 1)..active.len() {
                let d = mean_distance(dist, &active[i].1, &active[j].1);
                if d < best.2 {
                    best = (i, j, d);
                }
            }
        }
        let (i, j, distance) = best;
        let (right_id, right_members) = active.remove(j);
        let (left_id, mut members) = active.remove(i);
        members.extend(right_members);
        merges.push(Merge {
            left: left_id,
            right: right_id,
            distance,
        });
        active.push((n + merges.len() - 1, members));
    }
    merges
}

fn mean_distance(dist: &[Vec<f64>], a: &[usize], b: &[usize]) -> f64 {
    let total: f64 = a.iter().flat_map(|&i| b.iter().map(move |&j| dist[i][j])).sum();
    total / (a.len() * b.len()) as f64
}

/// Leaves in left-to-right drawing order.
pub fn leaf_order(n: usize, merges: &[Merge]) -> Vec<usize> {
    fn walk(node: usize, n: usize, merges: &[Merge], out: &mut Vec<usize>) {
        if node < n {
            out.push(node);
        } else {
            let m = &merges[node - n];
            walk(m.left, n, merges, out);
            walk(m.right, n, merges, out);
        }
    }

    let mut out = Vec::with_capacity(n);
    match merges.len() {
        0 => out.extend(0..n),
        k => walk(n + k - 1, n, merges, &mut out),
    }
    out
}
