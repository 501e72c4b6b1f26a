//! Tests for the match service: lifecycle, error mapping, atomic writes and
//! restart recovery.

use hare_hounds::{
    IllegalMove, Match, MatchId, MatchState, Move, MoveError, PieceKind, PlayerId, Position,
};
use hare_hounds_server::{
    DbError, DbErrorKind, InMemoryStore, MatchService, MatchStore, MaxIds, ServiceError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Store that can be switched to reject every write.
#[derive(Debug, Default)]
struct FlakyStore {
    inner: InMemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl MatchStore for FlakyStore {
    fn save(&self, game: &Match) -> Result<(), DbError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbError::new(DbErrorKind::Unavailable, "disk full"));
        }
        self.inner.save(game)
    }

    fn find(&self, id: MatchId) -> Result<Option<Match>, DbError> {
        self.inner.find(id)
    }

    fn load_unfinished(&self) -> Result<Vec<Match>, DbError> {
        self.inner.load_unfinished()
    }

    fn max_ids(&self) -> Result<MaxIds, DbError> {
        self.inner.max_ids()
    }
}

fn service() -> MatchService {
    MatchService::new(Arc::new(InMemoryStore::new())).expect("Failed to create service")
}

fn step(player: PlayerId, from: (i32, i32), to: (i32, i32)) -> Move {
    Move::new(player, from.into(), to.into())
}

#[test]
fn test_create_and_join() {
    let service = service();
    let hound = service.create(PieceKind::Hound).expect("Create failed");
    assert_eq!(*hound.game_id(), MatchId::new(0));
    assert_eq!(*hound.player_id(), PlayerId::new(0));
    assert_eq!(*hound.state(), MatchState::WaitingForSecondPlayer);

    let hare = service.join(*hound.game_id()).expect("Join failed");
    assert_eq!(*hare.piece_type(), PieceKind::Hare);
    assert_eq!(*hare.player_id(), PlayerId::new(1));
    assert_eq!(*hare.state(), MatchState::TurnHound);
}

#[test]
fn test_player_ids_unique_across_matches() {
    let service = service();
    let a = service.create(PieceKind::Hare).expect("Create failed");
    let b = service.create(PieceKind::Hound).expect("Create failed");
    let c = service.join(*a.game_id()).expect("Join failed");

    assert_ne!(a.game_id(), b.game_id());
    let mut players = vec![*a.player_id(), *b.player_id(), *c.player_id()];
    players.sort();
    players.dedup();
    assert_eq!(players.len(), 3);
}

#[test]
fn test_join_full_match() {
    let service = service();
    let info = service.create(PieceKind::Hound).expect("Create failed");
    service.join(*info.game_id()).expect("Join failed");
    assert!(matches!(
        service.join(*info.game_id()),
        Err(ServiceError::AlreadyJoined(_))
    ));
}

#[test]
fn test_unknown_match() {
    let service = service();
    let missing = MatchId::new(42);
    assert!(matches!(service.join(missing), Err(ServiceError::NotFound(_))));
    assert!(matches!(service.state(missing), Err(ServiceError::NotFound(_))));
    assert!(matches!(service.board(missing), Err(ServiceError::NotFound(_))));
    assert!(matches!(
        service.play(missing, step(PlayerId::new(0), (0, 1), (1, 1))),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn test_board_order_is_hare_then_hounds() {
    let service = service();
    let info = service.create(PieceKind::Hound).expect("Create failed");
    let pieces = service.board(*info.game_id()).expect("Board failed");
    let kinds: Vec<_> = pieces.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![PieceKind::Hare, PieceKind::Hound, PieceKind::Hound, PieceKind::Hound]
    );
    assert_eq!(pieces[0].position(), Position::new(4, 1));
}

#[test]
fn test_move_errors_surface() {
    let service = service();
    let hound = service.create(PieceKind::Hound).expect("Create failed");
    let id = *hound.game_id();

    assert!(matches!(
        service.play(id, step(*hound.player_id(), (0, 1), (1, 1))),
        Err(ServiceError::Move(MoveError::InvalidPlayer(_)))
    ));

    let hare = service.join(id).expect("Join failed");
    assert!(matches!(
        service.play(id, step(*hare.player_id(), (4, 1), (3, 1))),
        Err(ServiceError::Move(MoveError::IncorrectTurn { .. }))
    ));
    assert!(matches!(
        service.play(id, step(*hound.player_id(), (0, 1), (2, 1))),
        Err(ServiceError::Move(MoveError::IllegalMove(IllegalMove::NotASingleStep)))
    ));
    assert_eq!(
        service
            .play(id, step(*hound.player_id(), (0, 1), (1, 1)))
            .expect("Move failed"),
        MatchState::TurnHare
    );
}

#[test]
fn test_failed_store_write_leaves_match_untouched() {
    let store = Arc::new(FlakyStore::default());
    let service = MatchService::new(store.clone()).expect("Failed to create service");
    let hound = service.create(PieceKind::Hound).expect("Create failed");
    let id = *hound.game_id();
    service.join(id).expect("Join failed");
    let before = service.snapshot(id).expect("Snapshot failed");

    store.fail_writes();
    let result = service.play(id, step(*hound.player_id(), (0, 1), (1, 1)));
    assert!(matches!(result, Err(ServiceError::Storage(_))));
    assert_eq!(service.snapshot(id).expect("Snapshot failed"), before);
    assert_eq!(service.state(id).expect("State failed"), MatchState::TurnHound);
}

#[test]
fn test_failed_join_write_keeps_seat_open() {
    let store = Arc::new(FlakyStore::default());
    let service = MatchService::new(store.clone()).expect("Failed to create service");
    let info = service.create(PieceKind::Hare).expect("Create failed");

    store.fail_writes();
    assert!(matches!(
        service.join(*info.game_id()),
        Err(ServiceError::Storage(_))
    ));
    let game = service.snapshot(*info.game_id()).expect("Snapshot failed");
    assert_eq!(game.open_seat(), Some(PieceKind::Hound));
}

#[test]
fn test_restart_restores_matches_and_ids() {
    let store = Arc::new(InMemoryStore::new());
    let (id, hound) = {
        let service = MatchService::new(store.clone()).expect("Failed to create service");
        let hound = service.create(PieceKind::Hound).expect("Create failed");
        service.join(*hound.game_id()).expect("Join failed");
        service
            .play(*hound.game_id(), step(*hound.player_id(), (0, 1), (1, 1)))
            .expect("Move failed");
        (*hound.game_id(), *hound.player_id())
    };

    let service = MatchService::new(store).expect("Failed to restart service");
    assert_eq!(service.live_count(), 1);
    assert_eq!(service.state(id).expect("State failed"), MatchState::TurnHare);

    let next = service.create(PieceKind::Hare).expect("Create failed");
    assert_eq!(*next.game_id(), MatchId::new(1));
    assert_eq!(*next.player_id(), PlayerId::new(2));

    assert!(matches!(
        service.play(id, step(hound, (1, 0), (2, 0))),
        Err(ServiceError::Move(MoveError::IncorrectTurn { .. }))
    ));
}

#[test]
fn test_finished_match_readable_after_restart() {
    let store = Arc::new(InMemoryStore::new());
    let id = {
        let service = MatchService::new(store.clone()).expect("Failed to create service");
        let hound = service.create(PieceKind::Hound).expect("Create failed");
        let id = *hound.game_id();
        let hare = service.join(id).expect("Join failed");
        let shuffle = [
            (*hound.player_id(), (1, 0), (1, 1)),
            (*hare.player_id(), (4, 1), (3, 1)),
            (*hound.player_id(), (1, 1), (1, 0)),
            (*hare.player_id(), (3, 1), (4, 1)),
        ];
        for _ in 0..2 {
            for (player, from, to) in shuffle {
                service.play(id, step(player, from, to)).expect("Move failed");
            }
        }
        id
    };

    let service = MatchService::new(store).expect("Failed to restart service");
    assert_eq!(service.live_count(), 0);
    assert_eq!(
        service.state(id).expect("State failed"),
        MatchState::WinHareByStalling
    );
}

#[test]
fn test_concurrent_moves_apply_once() {
    let service = Arc::new(service());
    let hound = service.create(PieceKind::Hound).expect("Create failed");
    let id = *hound.game_id();
    service.join(id).expect("Join failed");

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = Arc::clone(&service);
            let player = *hound.player_id();
            thread::spawn(move || service.play(id, step(player, (0, 1), (1, 1))))
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(ServiceError::Move(MoveError::IncorrectTurn {
            expected: PieceKind::Hare
        }))
    )));
    assert_eq!(service.state(id).expect("State failed"), MatchState::TurnHare);

    let game = service.snapshot(id).expect("Snapshot failed");
    assert_eq!(game.ledger().len(), 2);
}

#[test]
fn test_concurrent_joins_seat_one_player() {
    let service = Arc::new(service());
    let info = service.create(PieceKind::Hare).expect("Create failed");
    let id = *info.game_id();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.join(id))
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    let joined: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(joined.len(), 1);
    assert_eq!(*joined[0].piece_type(), PieceKind::Hound);
    assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
        r,
        Err(ServiceError::AlreadyJoined(_))
    )));

    // Refused joins do not consume player ids.
    let next = service.create(PieceKind::Hound).expect("Create failed");
    assert_eq!(*next.player_id(), PlayerId::new(2));
}

#[test]
fn test_finished_match_leaves_memory() {
    let service = service();
    let hound = service.create(PieceKind::Hound).expect("Create failed");
    let id = *hound.game_id();
    let hare = service.join(id).expect("Join failed");
    let other = service.create(PieceKind::Hare).expect("Create failed");
    assert_eq!(service.live_count(), 2);

    let escape = [
        (*hound.player_id(), (0, 1), (1, 1)),
        (*hare.player_id(), (4, 1), (3, 1)),
        (*hound.player_id(), (1, 0), (2, 0)),
        (*hare.player_id(), (3, 1), (2, 1)),
        (*hound.player_id(), (2, 0), (3, 0)),
        (*hare.player_id(), (2, 1), (2, 0)),
        (*hound.player_id(), (1, 2), (2, 2)),
        (*hare.player_id(), (2, 0), (1, 0)),
    ];
    for (player, from, to) in escape {
        service.play(id, step(player, from, to)).expect("Move failed");
    }
    assert_eq!(service.live_count(), 1);

    assert_eq!(
        service.state(id).expect("State failed"),
        MatchState::WinHareByEscape
    );
    assert_eq!(
        service.board(id).expect("Board failed")[0].position(),
        Position::new(1, 0)
    );
    assert!(matches!(
        service.play(id, step(*hound.player_id(), (1, 1), (2, 1))),
        Err(ServiceError::Move(MoveError::IllegalMove(IllegalMove::GameOver(_))))
    ));
    assert!(matches!(service.join(id), Err(ServiceError::AlreadyJoined(_))));
    assert_eq!(service.live_count(), 1);
    assert_eq!(
        service.state(*other.game_id()).expect("State failed"),
        MatchState::WaitingForSecondPlayer
    );
}
