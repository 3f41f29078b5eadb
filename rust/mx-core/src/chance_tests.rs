#[cfg(test)]
mod tests {
    use crate::{
        empty_cells, sample_card, sample_empty_cell, shuffled_deck, splitmix64, Deck, Position,
        EMPTY_BOARD,
    };
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    #[test]
    fn sample_card_never_returns_exhausted_values() {
        let mut deck = Deck::full();
        for c in 1..=12 {
            for _ in 0..4 {
                deck.take(c);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(sample_card(&deck, &mut rng), 13);
        }
    }

    #[test]
    fn sample_card_follows_remaining_counts() {
        // 4 copies of 2, 1 copy of 5, nothing else.
        let mut deck = Deck::full();
        for c in [1u8, 3, 4, 6, 7, 8, 9, 10, 11, 12, 13] {
            for _ in 0..4 {
                deck.take(c);
            }
        }
        for _ in 0..3 {
            deck.take(5);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let n = 20_000;
        let twos = (0..n).filter(|_| sample_card(&deck, &mut rng) == 2).count();
        let frac = twos as f64 / n as f64;
        assert!((frac - 0.8).abs() < 0.02, "frac={}", frac);
    }

    #[test]
    #[should_panic]
    fn sample_card_from_empty_deck_panics() {
        let mut deck = Deck::full();
        for c in 1..=13 {
            for _ in 0..4 {
                deck.take(c);
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let _ = sample_card(&deck, &mut rng);
    }

    #[test]
    fn sample_empty_cell_picks_only_empty_cells() {
        let mut b = [[1u8; 5]; 5];
        b[1][3] = 0;
        b[4][0] = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let p = sample_empty_cell(&b, &mut rng);
            assert!(p == Position::new(1, 3) || p == Position::new(4, 0));
        }
        assert_eq!(empty_cells(&EMPTY_BOARD).len(), 25);
    }

    #[test]
    fn shuffled_deck_is_a_permutation_of_the_full_deck() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut cards = shuffled_deck(&mut rng);
        assert_eq!(cards.len(), 52);
        cards.sort_unstable();
        assert_eq!(cards, Deck::full().to_cards());
    }

    #[test]
    fn splitmix_is_deterministic_and_mixing() {
        assert_eq!(splitmix64(1), splitmix64(1));
        assert_ne!(splitmix64(1), splitmix64(2));
    }
}
