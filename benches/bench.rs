use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rand::rngs::StdRng;
use rand::SeedableRng;

use balanced_bst::avl::AvlTree;
use balanced_bst::randomized::RandomizedTree;

#[derive(Clone)]
enum TreeEnum<K> {
    Avl(AvlTree<K>),
    Randomized(RandomizedTree<K, StdRng>),
}

impl<K> TreeEnum<K> {
    fn contains(&self, k: &K) -> bool
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.contains(k),
            Self::Randomized(t) => t.contains(k),
        }
    }

    fn insert(&mut self, k: K)
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.insert(k),
            Self::Randomized(t) => t.insert(k),
        }
    }

    fn remove(&mut self, k: &K)
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.remove(k),
            Self::Randomized(t) => t.remove(k),
        }
    }
}

/// Helper to bench a function on a BST.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// implementations of BSTs before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut TreeEnum<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2usize.pow(num_levels as u32) - 1;
        let largest_element_in_tree = 2usize.pow(num_levels as u32) - 2;

        let avl_tree = {
            let mut tree = AvlTree::new();
            for x in 0..num_nodes {
                tree.insert(x as i32);
            }

            tree
        };
        let randomized_tree = {
            // Seeded so every run benchmarks the same structure.
            let mut tree = RandomizedTree::with_rng(StdRng::seed_from_u64(42));
            for x in 0..num_nodes {
                tree.insert(x as i32);
            }

            tree
        };
        let tree_tests = [
            ("avl", TreeEnum::Avl(avl_tree)),
            ("randomized", TreeEnum::Randomized(randomized_tree)),
        ];
        for (name, tree) in tree_tests {
            let id = BenchmarkId::new(name, largest_element_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree as i32));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "contains", |tree, i| {
        let _found = black_box(tree.contains(&i));
    });
    bench_helper(c, "remove", |tree, i| {
        tree.remove(&i);
    });

    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1);
    });

    bench_helper(c, "contains-miss", |tree, i| {
        let _found = black_box(tree.contains(&(i + 1)));
    });
    bench_helper(c, "remove-miss", |tree, i| {
        tree.remove(&(i + 1));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
