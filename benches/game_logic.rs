use criterion::{black_box, criterion_group, criterion_main, Criterion};
use candy_cascade::core::{find_matches, find_matching_swap, Board, Engine, SimpleRng};
use candy_cascade::term::{GameView, HudView, Viewport};

fn bench_generate(c: &mut Criterion) {
    let mut seed = 0u32;
    c.bench_function("generate_8x8", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            Board::generate(8, 6, &mut SimpleRng::new(black_box(seed)))
        })
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let board = Board::generate(16, 6, &mut SimpleRng::new(7)).unwrap();
    c.bench_function("find_matches_16x16", |b| {
        b.iter(|| find_matches(black_box(&board)))
    });
}

fn bench_hint(c: &mut Criterion) {
    let board = Board::generate(8, 6, &mut SimpleRng::new(7)).unwrap();
    c.bench_function("find_matching_swap_8x8", |b| {
        b.iter(|| find_matching_swap(black_box(&board)))
    });
}

fn bench_swap_and_cascade(c: &mut Criterion) {
    let engine = Engine::initialize(8, 6, Some(12345)).unwrap();
    c.bench_function("propose_swap_to_settled", |b| {
        b.iter(|| {
            let mut engine = engine.clone();
            if let Some((from, to)) = engine.hint() {
                let _ = engine.propose_swap(from, to);
            }
            engine.score()
        })
    });
}

fn bench_color_bomb(c: &mut Criterion) {
    let engine = Engine::initialize(8, 6, Some(12345)).unwrap();
    c.bench_function("color_bomb", |b| {
        b.iter(|| {
            let mut engine = engine.clone();
            let _ = engine.trigger_color_bomb(None);
            engine.score()
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let snap = Engine::initialize(8, 6, Some(1)).unwrap().snapshot();
    let view = GameView::default();
    let hud = HudView::new(20, 6000);
    let mut fb = candy_cascade::term::FrameBuffer::new(80, 24);
    c.bench_function("render_80x24", |b| {
        b.iter(|| view.render_into(black_box(&snap), &hud, Viewport::new(80, 24), &mut fb))
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_find_matches,
    bench_hint,
    bench_swap_and_cascade,
    bench_color_bomb,
    bench_render
);
criterion_main!(benches);
