use crate::model::card::{Card, format_cards};
use crate::model::deck::{BASE_HAND_SIZE, DECK_SIZE, Deck, KITTY_SIZE};
use crate::model::family::Family;
use crate::model::play::Play;
use crate::model::player::{PLAYER_COUNT, PlayerPosition};
use thiserror::Error;

/// Public state of one round: how many cards each seat still holds, which
/// cards are gone, whose turn it is and the play to beat.
///
/// Hands are not part of the state; callers own them and keep them in step
/// with [`RoundState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    remaining: [usize; PLAYER_COUNT],
    played: Vec<Card>,
    turn: PlayerPosition,
    previous: Option<Play>,
    retain_turn: bool,
}

/// What the seat to move may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<'a> {
    /// Any play; passing is not allowed.
    Lead,
    /// A play beating the one given, or a pass.
    Follow(&'a Play),
}

impl RoundState {
    /// Starts a round with the given hand sizes and `leader` to move.
    pub fn new(hand_sizes: [usize; PLAYER_COUNT], leader: PlayerPosition) -> Result<Self, MoveError> {
        let total: usize = hand_sizes.iter().sum();
        if total != DECK_SIZE {
            return Err(MoveError::InvalidDealSizes { total });
        }
        Ok(Self {
            remaining: hand_sizes,
            played: Vec::new(),
            turn: leader,
            previous: None,
            retain_turn: false,
        })
    }

    /// Standard opening: the landlord holds the kitty and leads.
    pub fn landlord(seat: PlayerPosition) -> Self {
        let mut remaining = [BASE_HAND_SIZE; PLAYER_COUNT];
        remaining[seat.index()] += KITTY_SIZE;
        Self {
            remaining,
            played: Vec::new(),
            turn: seat,
            previous: None,
            retain_turn: false,
        }
    }

    pub fn turn(&self) -> PlayerPosition {
        self.turn
    }

    pub fn previous(&self) -> Option<&Play> {
        self.previous.as_ref()
    }

    /// The seat whose play currently stands, if any.
    pub fn previous_actor(&self) -> Option<PlayerPosition> {
        self.previous.as_ref().and_then(Play::actor)
    }

    pub fn phase(&self) -> Phase<'_> {
        match &self.previous {
            Some(previous) if previous.actor() != Some(self.turn) => Phase::Follow(previous),
            _ => Phase::Lead,
        }
    }

    pub fn remaining(&self, seat: PlayerPosition) -> usize {
        self.remaining[seat.index()]
    }

    pub fn remaining_counts(&self) -> [usize; PLAYER_COUNT] {
        self.remaining
    }

    pub fn remaining_total(&self) -> usize {
        self.remaining.iter().sum()
    }

    pub fn played_cards(&self) -> &[Card] {
        &self.played
    }

    pub fn is_played(&self, card: Card) -> bool {
        self.played.contains(&card)
    }

    /// The seat that has emptied its hand.
    pub fn winner(&self) -> Option<PlayerPosition> {
        PlayerPosition::LOOP
            .into_iter()
            .find(|seat| self.remaining[seat.index()] == 0)
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    /// The pack minus every played card and `own`, in pack order.
    pub fn unseen_cards(&self, own: &[Card]) -> Vec<Card> {
        let mut taken = Vec::with_capacity(self.played.len() + own.len());
        taken.extend_from_slice(&self.played);
        taken.extend_from_slice(own);
        Deck::standard().without(&taken)
    }

    /// Checks that the seat to move may lay down `play`.
    pub fn validate(&self, play: &Play) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::RoundOver);
        }
        match play.actor() {
            Some(actor) if actor != self.turn => {
                return Err(MoveError::OutOfTurn {
                    expected: self.turn,
                    actual: actor,
                });
            }
            _ => {}
        }
        if play.is_empty() {
            return Err(MoveError::EmptyPlay);
        }
        if let Some(&card) = play.cards().iter().find(|card| self.is_played(**card)) {
            return Err(MoveError::CardAlreadyPlayed(card));
        }
        let held = self.remaining(self.turn);
        if held < play.len() {
            return Err(MoveError::InsufficientCards {
                seat: self.turn,
                held,
                needed: play.len(),
            });
        }
        if let Phase::Follow(previous) = self.phase() {
            if !play.beats(previous) {
                return Err(MoveError::DoesNotBeat {
                    play: format_cards(play.cards()),
                    previous: format_cards(previous.cards()),
                });
            }
        }
        Ok(())
    }

    /// Records `play` for the seat to move. The turn does not advance until
    /// [`RoundState::advance_turn`] is called.
    pub fn apply(&mut self, play: Play) -> Result<(), MoveError> {
        self.validate(&play)?;

        let seat = self.turn;
        self.remaining[seat.index()] -= play.len();
        self.played.extend_from_slice(play.cards());
        if play.family() == Family::DoubleJoker {
            // Nothing answers the double joker, so its actor leads again.
            self.previous = None;
            self.retain_turn = true;
        } else {
            self.previous = Some(play.with_actor(seat));
        }
        Ok(())
    }

    /// Declines to play and hands the turn on.
    pub fn pass(&mut self) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::RoundOver);
        }
        if self.phase() == Phase::Lead {
            return Err(MoveError::PassOnLead);
        }
        self.advance_turn();
        Ok(())
    }

    pub fn advance_turn(&mut self) {
        if self.is_over() {
            return;
        }
        if std::mem::take(&mut self.retain_turn) {
            return;
        }
        self.turn = self.turn.next();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the round is already over")]
    RoundOver,
    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn {
        expected: PlayerPosition,
        actual: PlayerPosition,
    },
    #[error("[{play}] does not beat [{previous}]")]
    DoesNotBeat { play: String, previous: String },
    #[error("the leading seat must play")]
    PassOnLead,
    #[error("card {0} has already been played")]
    CardAlreadyPlayed(Card),
    #[error("a play needs at least one card")]
    EmptyPlay,
    #[error("hand sizes add up to {total}, expected 54")]
    InvalidDealSizes { total: usize },
    #[error("{seat} holds {held} cards but the play needs {needed}")]
    InsufficientCards {
        seat: PlayerPosition,
        held: usize,
        needed: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{MoveError, Phase, RoundState};
    use crate::model::card::{Card, parse_cards};
    use crate::model::deck::DECK_SIZE;
    use crate::model::play::Play;
    use crate::model::player::PlayerPosition;

    fn play(text: &str) -> Play {
        Play::classify(&parse_cards(text).unwrap()).unwrap()
    }

    #[test]
    fn landlord_round_starts_twenty_seventeen_seventeen() {
        let round = RoundState::landlord(PlayerPosition::Second);
        assert_eq!(round.remaining_counts(), [17, 20, 17]);
        assert_eq!(round.turn(), PlayerPosition::Second);
        assert_eq!(round.phase(), Phase::Lead);
        assert_eq!(round.winner(), None);
    }

    #[test]
    fn deal_sizes_must_cover_the_pack() {
        assert_eq!(
            RoundState::new([17, 17, 17], PlayerPosition::First),
            Err(MoveError::InvalidDealSizes { total: 51 })
        );
        assert!(RoundState::new([52, 1, 1], PlayerPosition::Third).is_ok());
    }

    #[test]
    fn play_then_follow_then_pass_back_to_lead() {
        let mut round = RoundState::landlord(PlayerPosition::First);
        round.apply(play("5h")).unwrap();
        round.advance_turn();
        assert_eq!(round.turn(), PlayerPosition::Second);
        assert!(matches!(round.phase(), Phase::Follow(p) if p.actor() == Some(PlayerPosition::First)));

        assert!(matches!(round.apply(play("4d")), Err(MoveError::DoesNotBeat { .. })));
        round.apply(play("9d")).unwrap();
        round.advance_turn();
        round.pass().unwrap();
        assert_eq!(round.turn(), PlayerPosition::First);
        round.pass().unwrap();
        assert_eq!(round.turn(), PlayerPosition::Second);
        assert_eq!(round.phase(), Phase::Lead);
        assert_eq!(round.pass(), Err(MoveError::PassOnLead));
    }

    #[test]
    fn remaining_total_tracks_plays_and_passes() {
        let mut round = RoundState::landlord(PlayerPosition::First);
        round.apply(play("3h 4d 5s 6c 7h")).unwrap();
        assert_eq!(round.remaining_total(), DECK_SIZE - 5);
        assert_eq!(round.remaining_total() + round.played_cards().len(), DECK_SIZE);
        round.advance_turn();
        round.pass().unwrap();
        assert_eq!(round.remaining_total(), DECK_SIZE - 5);
    }

    #[test]
    fn failed_apply_leaves_state_untouched() {
        let mut round = RoundState::landlord(PlayerPosition::First);
        round.apply(play("8h")).unwrap();
        round.advance_turn();
        let before = round.clone();

        assert_eq!(
            round.apply(play("8h 8d")),
            Err(MoveError::CardAlreadyPlayed(parse_cards("8h").unwrap()[0]))
        );
        let stranger = play("Kh").with_actor(PlayerPosition::Third);
        assert!(matches!(round.apply(stranger), Err(MoveError::OutOfTurn { .. })));
        assert_eq!(round, before);
    }

    #[test]
    fn double_joker_keeps_the_turn() {
        let mut round = RoundState::landlord(PlayerPosition::Third);
        round.apply(play("Z0 Z1")).unwrap();
        assert!(round.previous().is_none());
        round.advance_turn();
        assert_eq!(round.turn(), PlayerPosition::Third);
        assert_eq!(round.phase(), Phase::Lead);
        round.apply(play("3h")).unwrap();
        round.advance_turn();
        assert_eq!(round.turn(), PlayerPosition::First);
    }

    #[test]
    fn emptied_hand_ends_the_round() {
        let mut round = RoundState::new([1, 26, 27], PlayerPosition::First).unwrap();
        round.apply(play("3h")).unwrap();
        assert_eq!(round.winner(), Some(PlayerPosition::First));
        round.advance_turn();
        assert_eq!(round.turn(), PlayerPosition::First);
        assert_eq!(round.apply(play("4h")), Err(MoveError::RoundOver));
        assert_eq!(round.pass(), Err(MoveError::RoundOver));
    }

    #[test]
    fn plays_larger_than_the_hand_are_rejected() {
        let mut round = RoundState::new([2, 26, 26], PlayerPosition::First).unwrap();
        assert_eq!(
            round.apply(play("3h 3d 3s")),
            Err(MoveError::InsufficientCards {
                seat: PlayerPosition::First,
                held: 2,
                needed: 3,
            })
        );
    }

    #[test]
    fn unseen_cards_exclude_played_and_own() {
        let mut round = RoundState::landlord(PlayerPosition::First);
        round.apply(play("Z0 Z1")).unwrap();
        let own = parse_cards("3h 3d").unwrap();
        let unseen = round.unseen_cards(&own);
        assert_eq!(unseen.len(), DECK_SIZE - 4);
        assert!(!unseen.contains(&Card::BIG_JOKER));
        assert!(!unseen.contains(&own[0]));
    }
}
