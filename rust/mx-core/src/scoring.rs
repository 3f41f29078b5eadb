//! Line and board scoring.
//!
//! A board is scored over its 12 lines (5 rows, 5 columns, 2 diagonals). Each line is
//! classified by the multiplicities of its non-zero cards; empty cells (0) never count
//! toward a combination, so partially filled boards can be scored too.

use crate::action::{Card, Reward, BOARD_SIZE, COPIES_PER_CARD, EMPTY, MAX_CARD};
use crate::board::{Board, Line};

pub const PAIR: Reward = 10;
pub const TWO_PAIRS: Reward = 20;
pub const THREE_OF_A_KIND: Reward = 40;
pub const STRAIGHT: Reward = 50;
pub const FULL_HOUSE: Reward = 80;
/// Three 1s and two 13s.
pub const FULL_HOUSE_ONES_THIRTEENS: Reward = 100;
/// Exactly 1, 10, 11, 12, 13.
pub const STRAIGHT_ONE_TEN_TO_THIRTEEN: Reward = 150;
pub const FOUR_OF_A_KIND: Reward = 160;
pub const FOUR_ONES: Reward = 200;

/// Number of scored lines on a board.
pub const NUM_LINES: usize = 2 * BOARD_SIZE + 2;

/// Score a single 5-card line.
///
/// # Panics
/// Panics if a value is out of range or appears more than four times; neither can happen
/// on a board that respects deck scarcity.
pub fn score_line(line: &Line) -> Reward {
    let mut cnt = [0u8; MAX_CARD as usize + 1];
    for &card in line {
        assert!(card <= MAX_CARD, "card out of range: {}", card);
        cnt[card as usize] += 1;
    }
    let filled = BOARD_SIZE - cnt[EMPTY as usize] as usize;
    cnt[EMPTY as usize] = 0;

    let mut pairs = 0u8;
    let mut triple: Option<Card> = None;
    for (card, &n) in cnt.iter().enumerate().skip(1) {
        match n {
            0 | 1 => {}
            2 => pairs += 1,
            3 => triple = Some(card as Card),
            4 => {
                return if card == 1 { FOUR_ONES } else { FOUR_OF_A_KIND };
            }
            _ => panic!(
                "impossible line {:?}: card {} appears {} times (max {})",
                line, card, n, COPIES_PER_CARD
            ),
        }
    }

    match (triple, pairs) {
        (Some(1), 1) if cnt[13] == 2 => FULL_HOUSE_ONES_THIRTEENS,
        (Some(_), 1) => FULL_HOUSE,
        (Some(_), _) => THREE_OF_A_KIND,
        (None, 2) => TWO_PAIRS,
        (None, 1) => PAIR,
        (None, _) if filled == BOARD_SIZE => score_distinct(line, &cnt),
        (None, _) => 0,
    }
}

// Five distinct non-zero cards.
fn score_distinct(line: &Line, cnt: &[u8; MAX_CARD as usize + 1]) -> Reward {
    if cnt[1] == 1 && cnt[10] == 1 && cnt[11] == 1 && cnt[12] == 1 && cnt[13] == 1 {
        return STRAIGHT_ONE_TEN_TO_THIRTEEN;
    }
    let min = line.iter().copied().min().unwrap_or(EMPTY);
    let max = line.iter().copied().max().unwrap_or(EMPTY);
    if min > EMPTY && max - min == (BOARD_SIZE as Card) - 1 {
        STRAIGHT
    } else {
        0
    }
}

/// The 12 scored lines: rows 0..5, columns 0..5, main diagonal, anti-diagonal.
pub fn lines(board: &Board) -> [Line; NUM_LINES] {
    let mut out = [[EMPTY; BOARD_SIZE]; NUM_LINES];
    for i in 0..BOARD_SIZE {
        out[i] = board[i];
        for (j, row) in board.iter().enumerate() {
            out[BOARD_SIZE + i][j] = row[i];
        }
        out[2 * BOARD_SIZE][i] = board[i][i];
        out[2 * BOARD_SIZE + 1][i] = board[i][BOARD_SIZE - 1 - i];
    }
    out
}

/// Per-line scores in [`lines`] order.
pub fn line_scores(board: &Board) -> [Reward; NUM_LINES] {
    let mut out = [0; NUM_LINES];
    for (o, line) in out.iter_mut().zip(lines(board).iter()) {
        *o = score_line(line);
    }
    out
}

/// Total board score: sum over all 12 lines.
pub fn score_board(board: &Board) -> Reward {
    lines(board).iter().map(score_line).sum()
}
