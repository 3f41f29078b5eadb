use crate::{
    search, search_with, Mcts, MctsConfig, MctsError, PartialScore, PolicyFn, RandomFill,
    RolloutPolicy, SinglePhase, Stepwise, TwoPhase, CLOCK_CHECK_INTERVAL,
};
use mx_core::{
    score_board, Action, Board, Deck, GameState, Reward, SearchConfig, Variant, EMPTY_BOARD,
};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn cfg(sims: u32, seed: u64) -> MctsConfig {
    MctsConfig {
        exploration: std::f64::consts::FRAC_1_SQRT_2,
        max_simulations: sims,
        max_time_ms: 60_000,
        seed,
    }
}

fn mid_game() -> Board {
    let mut b = EMPTY_BOARD;
    b[0][0] = 1;
    b[1][0] = 1;
    b[1][1] = 2;
    b[3][3] = 8;
    b[4][0] = 4;
    b
}

/// 24 filled cells, `(4, 4)` empty.
fn one_cell_left() -> Board {
    let mut b = EMPTY_BOARD;
    for (i, v) in b.iter_mut().flatten().enumerate().take(24) {
        *v = (i % 13) as u8 + 1;
    }
    b
}

#[test]
fn search_leaves_state_untouched() {
    let mut policies: Vec<Box<dyn RolloutPolicy>> =
        vec![Box::new(RandomFill), Box::new(Stepwise), Box::new(PartialScore)];
    for p in policies.iter_mut() {
        let mut s = GameState::new(mid_game(), Some(1)).unwrap();
        let before = s;
        let mut m = Mcts::new(SinglePhase, cfg(400, 3)).unwrap();
        m.run_search(&mut s, p.as_mut()).unwrap();
        assert_eq!(s, before);
        assert!(s.deck_is_consistent());

        let mut s = GameState::new(mid_game(), None).unwrap();
        let before = s;
        let mut m = Mcts::new(TwoPhase, cfg(400, 3)).unwrap();
        m.run_search(&mut s, p.as_mut()).unwrap();
        assert_eq!(s, before);
    }
}

#[test]
fn root_children_visits_sum_to_simulations() {
    let mut s = GameState::new(mid_game(), Some(1)).unwrap();
    let mut m = Mcts::new(SinglePhase, cfg(500, 11)).unwrap();
    let res = m.run_search(&mut s, &mut RandomFill).unwrap();
    assert_eq!(res.simulations, 500);

    let total: u32 = m
        .root_children()
        .iter()
        .map(|&c| m.arena().get(c).visits)
        .sum();
    assert_eq!(total, res.simulations);
    assert_eq!(res.stats.node_count, m.arena().len());
    assert_eq!(res.stats.expansions as usize, res.stats.node_count - 1);
}

#[test]
fn every_root_action_is_tried_exactly_once() {
    let mut s = GameState::new(EMPTY_BOARD, Some(5)).unwrap();
    let mut m = Mcts::new(SinglePhase, cfg(25, 0)).unwrap();
    m.run_search(&mut s, &mut PartialScore).unwrap();

    let actions: HashSet<Action> = m
        .root_children()
        .iter()
        .map(|&c| m.arena().get(c).edge().0)
        .collect();
    assert_eq!(m.root_children().len(), 25);
    assert_eq!(actions.len(), 25);
}

#[test]
fn equal_children_resolve_to_the_first() {
    // A lone card scores nothing, so all 25 root children end with reward 0.
    let mut s = GameState::new(EMPTY_BOARD, Some(5)).unwrap();
    let mut m = Mcts::new(SinglePhase, cfg(25, 7)).unwrap();
    let res = m.run_search(&mut s, &mut PartialScore).unwrap();

    let first = m.root_children()[0];
    assert_eq!(m.best_child(crate::ROOT, 0.0), first);
    assert_eq!(res.action, m.arena().get(first).edge().0);
    assert_eq!(res.expected_reward, 0.0);
}

#[test]
fn best_child_is_the_strict_maximum_of_smoothed_means() {
    let mut s = GameState::new(mid_game(), Some(1)).unwrap();
    let mut m = Mcts::new(SinglePhase, cfg(3_000, 5)).unwrap();
    let res = m.run_search(&mut s, &mut RandomFill).unwrap();

    let mut best = m.root_children()[0];
    let mut best_value = f64::NEG_INFINITY;
    for &c in m.root_children() {
        let n = m.arena().get(c);
        let value = n.reward as f64 / (n.visits as f64 + 1.0);
        if value > best_value {
            best = c;
            best_value = value;
        }
    }
    assert_eq!(m.best_child(crate::ROOT, 0.0), best);

    let n = m.arena().get(best);
    assert_eq!(res.action, n.edge().0);
    assert_eq!(res.expected_reward, n.reward as f64 / n.visits as f64);
}

#[test]
fn same_seed_same_result() {
    let run = |seed| {
        let mut s = GameState::new(mid_game(), Some(1)).unwrap();
        let mut m = Mcts::new(SinglePhase, cfg(800, seed)).unwrap();
        let r = m.run_search(&mut s, &mut RandomFill).unwrap();
        (r.action, r.expected_reward, r.stats.node_count)
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn rerunning_an_instance_discards_the_old_tree() {
    let mut s = GameState::new(mid_game(), Some(1)).unwrap();
    let mut m = Mcts::new(SinglePhase, cfg(300, 9)).unwrap();
    let a = m.run_search(&mut s, &mut RandomFill).unwrap();
    let b = m.run_search(&mut s, &mut RandomFill).unwrap();
    assert_eq!(a.action, b.action);
    assert_eq!(a.stats.node_count, b.stats.node_count);
}

#[test]
fn zero_time_budget_completes_no_round() {
    let mut s = GameState::new(mid_game(), Some(1)).unwrap();
    let mut c = cfg(1_000, 0);
    c.max_time_ms = 0;
    let mut m = Mcts::new(SinglePhase, c).unwrap();
    let err = m.run_search(&mut s, &mut RandomFill).unwrap_err();
    assert!(matches!(err, MctsError::NoSimulations));
}

#[test]
fn time_budget_stops_on_a_clock_check() {
    let mut s = GameState::new(mid_game(), Some(1)).unwrap();
    let mut c = cfg(u32::MAX, 0);
    c.max_time_ms = 20;
    let mut m = Mcts::new(SinglePhase, c).unwrap();
    let res = m.run_search(&mut s, &mut Stepwise).unwrap();

    assert!(res.simulations > 0);
    assert_eq!(res.simulations % CLOCK_CHECK_INTERVAL, 0);
    assert!(res.elapsed >= std::time::Duration::from_millis(20));
}

#[test]
fn last_cell_is_valued_by_the_finished_board() {
    let b = one_cell_left();
    let mut s = GameState::new(b, Some(12)).unwrap();
    let mut m = Mcts::new(SinglePhase, cfg(10, 0)).unwrap();
    let res = m.run_search(&mut s, &mut RandomFill).unwrap();

    let mut filled = b;
    filled[4][4] = 12;
    assert_eq!(res.action, Action::Place(mx_core::Position::new(4, 4)));
    assert_eq!(res.expected_reward, score_board(&filled) as f64);
    assert_eq!(res.stats.terminal_leaves, 10);
}

#[test]
fn full_board_is_rejected() {
    let mut b = EMPTY_BOARD;
    for (i, v) in b.iter_mut().flatten().enumerate() {
        *v = (i % 13) as u8 + 1;
    }
    let err = search(&b, None, &SearchConfig::default()).unwrap_err();
    assert!(matches!(err, MctsError::TerminalRoot));
}

#[test]
fn single_phase_without_card_is_rejected() {
    let err = search(&mid_game(), None, &SearchConfig::default()).unwrap_err();
    assert!(matches!(err, MctsError::MissingCard));
}

#[test]
fn invalid_board_is_rejected() {
    let mut b = EMPTY_BOARD;
    for c in 0..5 {
        b[0][c] = 6;
    }
    let err = search(&b, Some(1), &SearchConfig::default()).unwrap_err();
    assert!(matches!(err, MctsError::Board(_)));
}

#[test]
fn invalid_config_is_rejected() {
    let mut c = cfg(10, 0);
    c.exploration = -1.0;
    assert!(matches!(
        Mcts::new(SinglePhase, c),
        Err(MctsError::InvalidConfig { .. })
    ));
    c.exploration = f64::NAN;
    assert!(Mcts::new(TwoPhase, c).is_err());
    let mut c = cfg(0, 0);
    c.exploration = 1.0;
    assert!(Mcts::new(SinglePhase, c).is_err());
}

#[test]
fn two_phase_root_action_matches_phase() {
    let mut c = SearchConfig {
        max_simulations: 300,
        max_time_ms: 60_000,
        variant: Variant::TwoPhase,
        rollout: mx_core::RolloutKind::Stepwise,
        ..SearchConfig::default()
    };
    let res = search(&mid_game(), None, &c).unwrap();
    assert!(matches!(res.action, Action::Card(_)));

    c.seed = 5;
    let res = search(&mid_game(), Some(9), &c).unwrap();
    match res.action {
        Action::Place(p) => assert_eq!(mid_game()[p.row as usize][p.col as usize], 0),
        other => panic!("expected a placement, got {}", other),
    }
}

#[test]
fn injected_rollout_is_called_per_nonterminal_leaf() {
    let mut calls = 0u32;
    let mut policy = PolicyFn(|_b: &Board, d: &Deck, _rng: &mut ChaCha8Rng| {
        calls += 1;
        d.total() as Reward
    });
    let mut s = GameState::new(mid_game(), Some(1)).unwrap();
    let res = search_with(&mut s, Variant::SinglePhase, &cfg(200, 1), &mut policy).unwrap();
    drop(policy);
    assert_eq!(calls, res.simulations - res.stats.terminal_leaves);
}
