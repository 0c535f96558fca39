//! Property tests - invariants that must hold for any seed

use candy_cascade::core::resolver::resolve_to_settled;
use candy_cascade::core::{swap_candidates, Board, Engine, SimpleRng};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn generated_board_is_settled(seed in any::<u32>(), size in 3u8..=12, palette in 3u8..=6) {
        let board = Board::generate(size, palette, &mut SimpleRng::new(seed)).unwrap();
        prop_assert!(board.is_settled());
        prop_assert_eq!(board.empty_count(), 0);
    }

    #[test]
    fn swap_is_an_involution(seed in any::<u32>(), pick in any::<prop::sample::Index>()) {
        let mut board = Board::generate(8, 6, &mut SimpleRng::new(seed)).unwrap();
        let original = board.clone();
        let candidates = swap_candidates(8);
        let (a, b) = candidates[pick.index(candidates.len())];
        board.swap(a, b).unwrap();
        board.swap(a, b).unwrap();
        prop_assert_eq!(board, original);
    }

    #[test]
    fn score_never_decreases_and_board_stays_settled(
        seed in any::<u32>(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..24),
    ) {
        let mut engine = Engine::initialize(8, 6, Some(seed)).unwrap();
        let candidates = swap_candidates(8);
        let mut last = engine.score();
        for pick in picks {
            let (a, b) = candidates[pick.index(candidates.len())];
            let before = engine.board().clone();
            let out = engine.propose_swap(a, b).unwrap();
            if !out.accepted {
                prop_assert_eq!(engine.board(), &before);
            }
            prop_assert!(engine.score() >= last);
            prop_assert_eq!(engine.score() - last, out.total_score_delta);
            prop_assert!(engine.board().is_settled());
            prop_assert!(!engine.is_busy());
            last = engine.score();
        }
    }

    #[test]
    fn cascades_terminate_on_noisy_boards(seed in any::<u32>(), size in 3u8..=10) {
        let mut rng = SimpleRng::new(seed);
        let mut board = Board::empty(size, 6);
        board.apply_gravity_and_refill(&mut rng);
        let summary = resolve_to_settled(&mut board, &mut rng);
        prop_assert!(board.is_settled());
        prop_assert_eq!(summary.points, summary.cleared * 100);
    }

    #[test]
    fn color_bomb_bonus_matches_wiped_count(seed in any::<u32>()) {
        let mut engine = Engine::initialize(8, 6, Some(seed)).unwrap();
        let out = engine.trigger_color_bomb(None).unwrap();
        prop_assert!(out.cleared_count > 0);
        prop_assert_eq!(out.bonus_score, out.cleared_count * 150 + 500);
        prop_assert!(engine.board().is_settled());
    }
}
