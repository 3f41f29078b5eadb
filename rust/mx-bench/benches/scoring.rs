use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn gen_boards(n: usize) -> Vec<mx_core::Board> {
    // Fixed seed: full boards dealt from a shuffled deck.
    let mut rng = ChaCha8Rng::seed_from_u64(0x1234_5678_9ABC_DEF0);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let deal = mx_core::shuffled_deck(&mut rng);
        let mut b = mx_core::EMPTY_BOARD;
        for (cell, &card) in b.iter_mut().flatten().zip(deal.iter()) {
            *cell = card;
        }
        out.push(b);
    }
    out
}

fn bench_score_board(c: &mut Criterion) {
    let mut g = c.benchmark_group("mx_core_scoring");
    for &n in &[256usize, 4096usize] {
        let boards = gen_boards(n);
        g.bench_with_input(BenchmarkId::new("score_board_batch", n), &boards, |b, s| {
            b.iter(|| {
                for board in s.iter() {
                    black_box(mx_core::score_board(black_box(board)));
                }
            })
        });
    }
    g.finish();
}

criterion_group!(benches, bench_score_board);
criterion_main!(benches);
