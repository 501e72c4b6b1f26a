//! Full-game scenarios played through the public match API.

use hare_hounds::{
    IllegalMove, Match, MatchId, MatchState, Move, MoveError, PieceKind, PlayerId, Position,
};

const HOUND: PlayerId = PlayerId::new(1);
const HARE: PlayerId = PlayerId::new(2);

/// A started match with the hound player created first.
fn started() -> Match {
    let mut game = Match::create(MatchId::new(1), PieceKind::Hound, HOUND);
    game.join(HARE).expect("Second seat should be open");
    game
}

fn play(game: &mut Match, player: PlayerId, from: (i32, i32), to: (i32, i32)) -> Result<MatchState, MoveError> {
    game.apply_move(&Move::new(player, from.into(), to.into()))
}

/// Plays alternating hound and hare moves, expecting each to be accepted.
fn play_all(game: &mut Match, moves: &[((i32, i32), (i32, i32))]) -> MatchState {
    let mut state = game.state();
    for (i, &(from, to)) in moves.iter().enumerate() {
        let player = if i % 2 == 0 { HOUND } else { HARE };
        state = play(game, player, from, to)
            .unwrap_or_else(|e| panic!("move {i} {from:?}->{to:?} refused: {e}"));
    }
    state
}

#[test]
fn test_move_before_second_player_is_invalid() {
    let mut game = Match::create(MatchId::new(1), PieceKind::Hound, HOUND);
    assert_eq!(
        play(&mut game, HOUND, (0, 1), (1, 1)),
        Err(MoveError::InvalidPlayer(HOUND))
    );
    assert_eq!(game.state(), MatchState::WaitingForSecondPlayer);
}

#[test]
fn test_first_hound_move() {
    let mut game = started();
    assert_eq!(play(&mut game, HOUND, (0, 1), (1, 1)), Ok(MatchState::TurnHare));
}

#[test]
fn test_hare_cannot_move_first() {
    let mut game = started();
    assert_eq!(
        play(&mut game, HARE, (4, 1), (3, 1)),
        Err(MoveError::IncorrectTurn {
            expected: PieceKind::Hound
        })
    );
}

#[test]
fn test_hare_cannot_jump() {
    let mut game = started();
    play(&mut game, HOUND, (0, 1), (1, 1)).expect("Opening move");
    assert_eq!(
        play(&mut game, HARE, (4, 1), (2, 1)),
        Err(MoveError::IllegalMove(IllegalMove::NotASingleStep))
    );
    assert_eq!(game.state(), MatchState::TurnHare);
}

#[test]
fn test_hound_cannot_move_backward() {
    let mut game = started();
    play(&mut game, HOUND, (0, 1), (1, 1)).expect("Opening move");
    play(&mut game, HARE, (4, 1), (3, 1)).expect("Hare reply");
    assert_eq!(
        play(&mut game, HOUND, (1, 1), (0, 1)),
        Err(MoveError::IllegalMove(IllegalMove::HoundRetreat))
    );
}

#[test]
fn test_cannot_move_opponent_piece() {
    let mut game = started();
    play(&mut game, HOUND, (0, 1), (1, 1)).expect("Opening move");
    assert_eq!(
        play(&mut game, HARE, (1, 0), (2, 0)),
        Err(MoveError::IllegalMove(IllegalMove::NotYourPiece(Position::new(1, 0))))
    );
}

#[test]
fn test_turns_alternate() {
    let mut game = started();
    let moves = [
        ((0, 1), (1, 1)),
        ((4, 1), (3, 1)),
        ((1, 0), (2, 0)),
        ((3, 1), (3, 2)),
    ];
    let mut expected = MatchState::TurnHare;
    for (i, &(from, to)) in moves.iter().enumerate() {
        let player = if i % 2 == 0 { HOUND } else { HARE };
        assert_eq!(play(&mut game, player, from, to), Ok(expected));
        expected = match expected {
            MatchState::TurnHare => MatchState::TurnHound,
            _ => MatchState::TurnHare,
        };
    }
}

#[test]
fn test_hare_wins_by_escape() {
    let mut game = started();
    let state = play_all(
        &mut game,
        &[
            ((0, 1), (1, 1)),
            ((4, 1), (3, 1)),
            ((1, 0), (2, 0)),
            ((3, 1), (2, 1)),
            ((2, 0), (3, 0)),
            ((2, 1), (2, 0)),
            ((1, 2), (2, 2)),
            ((2, 0), (1, 0)),
        ],
    );
    assert_eq!(state, MatchState::WinHareByEscape);
    assert!(game.is_finished());
}

#[test]
fn test_hounds_win_by_trap() {
    let mut game = started();
    let state = play_all(
        &mut game,
        &[
            ((0, 1), (1, 1)),
            ((4, 1), (3, 1)),
            ((1, 0), (2, 0)),
            ((3, 1), (4, 1)),
            ((1, 1), (2, 1)),
            ((4, 1), (3, 1)),
            ((1, 2), (2, 2)),
            ((3, 1), (4, 1)),
            ((2, 0), (3, 0)),
            ((4, 1), (3, 1)),
            ((2, 2), (3, 2)),
            ((3, 1), (4, 1)),
            ((2, 1), (3, 1)),
        ],
    );
    assert_eq!(state, MatchState::WinHound);
}

#[test]
fn test_hare_wins_by_stalling() {
    let mut game = started();
    let shuffle = [
        ((1, 0), (1, 1)),
        ((4, 1), (3, 1)),
        ((1, 1), (1, 0)),
        ((3, 1), (4, 1)),
    ];
    assert_eq!(play_all(&mut game, &shuffle[..]), MatchState::TurnHound);
    assert_eq!(play_all(&mut game, &shuffle[..]), MatchState::WinHareByStalling);
    assert_eq!(game.ledger().count(&game.board().fingerprint()), 3);
}

#[test]
fn test_no_moves_after_win() {
    let mut game = started();
    let shuffle = [
        ((1, 0), (1, 1)),
        ((4, 1), (3, 1)),
        ((1, 1), (1, 0)),
        ((3, 1), (4, 1)),
    ];
    play_all(&mut game, &shuffle[..]);
    play_all(&mut game, &shuffle[..]);

    let before = game.clone();
    assert_eq!(
        play(&mut game, HOUND, (1, 0), (1, 1)),
        Err(MoveError::IllegalMove(IllegalMove::GameOver(
            MatchState::WinHareByStalling
        )))
    );
    assert_eq!(game, before);
}

#[test]
fn test_hare_creator_still_waits_for_hounds_to_open() {
    let mut game = Match::create(MatchId::new(5), PieceKind::Hare, HARE);
    assert_eq!(game.join(HOUND), Ok(PieceKind::Hound));
    assert_eq!(game.state(), MatchState::TurnHound);
    assert_eq!(play(&mut game, HOUND, (1, 2), (2, 2)), Ok(MatchState::TurnHare));
}

#[test]
fn test_restore_mid_game_and_continue() {
    let mut game = started();
    play_all(&mut game, &[((0, 1), (1, 1)), ((4, 1), (3, 1))]);

    let json = game.to_json().expect("Serialize failed");
    let mut restored = Match::from_json(&json).expect("Restore failed");
    assert_eq!(restored, game);

    assert_eq!(
        play(&mut restored, HOUND, (1, 0), (2, 0)),
        play(&mut game, HOUND, (1, 0), (2, 0))
    );
    assert_eq!(restored.ledger(), game.ledger());
}
