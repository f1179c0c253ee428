use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::engine::{GameState, Move};
use std::hint::black_box;

fn corpus(dim: usize) -> Vec<GameState> {
    let mut rng = StdRng::seed_from_u64(1337);
    let mut s = GameState::new(dim).unwrap();
    s.reset(&mut rng).unwrap();
    let mut states = vec![s.clone()];
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..64 {
        if s.board().is_stuck() {
            break;
        }
        s.make_move(seq[i % seq.len()], &mut rng).unwrap();
        states.push(s.clone());
    }
    states
}

fn bench_shift(c: &mut Criterion) {
    for dim in [4, 8] {
        let states = corpus(dim);
        c.bench_function(&format!("engine/shift_all_dirs/{dim}x{dim}"), |bch| {
            bch.iter(|| {
                let mut points = 0u64;
                for s in &states {
                    for dir in Move::ALL {
                        let mut b = s.board().clone();
                        points += b.shift(dir).points;
                    }
                }
                black_box(points)
            })
        });
    }
}

fn bench_make_move(c: &mut Criterion) {
    let states = corpus(4);
    c.bench_function("engine/make_move", |bch| {
        let mut rng = StdRng::seed_from_u64(7);
        bch.iter(|| {
            let mut moved = 0u32;
            for s in &states {
                let mut s = s.clone();
                if s.make_move(Move::Left, &mut rng).unwrap() {
                    moved += 1;
                }
            }
            black_box(moved)
        })
    });
}

criterion_group!(engine_ops, bench_shift, bench_make_move);
criterion_main!(engine_ops);
