//! One client's game session
//!
//! Maps parsed client messages onto its own [`GameEngine`]. Nothing here
//! touches the network, so the whole request/response mapping is testable
//! without sockets.

use tracing::{debug, warn};

use crate::core::{GameEngine, GameOptions};
use crate::engine::{apply_place_rotated, CommandError};
use crate::persist::validate_saved;
use crate::protocol::*;
use crate::types::{Difficulty, Rotation};

pub struct Session {
    engine: GameEngine,
    last_seq: Option<u64>,
}

impl Session {
    pub fn new(seed: u32) -> Self {
        Self {
            engine: GameEngine::new(seed, GameOptions::default()),
            last_seq: None,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Accept `seq` only if it is greater than every earlier one
    fn check_and_update_seq(&mut self, seq: u64) -> bool {
        match self.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                self.last_seq = Some(seq);
                true
            }
        }
    }

    /// Handle one raw line; always produces exactly one reply
    pub fn handle_line(&mut self, line: &str) -> ServerMessage {
        match serde_json::from_str::<ClientMessage>(line) {
            Ok(msg) => self.handle(msg),
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                debug!(seq, error = %e, "unparseable message");
                ServerMessage::error(seq, ErrorCode::InvalidJson, e.to_string())
            }
        }
    }

    pub fn handle(&mut self, msg: ClientMessage) -> ServerMessage {
        let seq = msg.seq();
        if !self.check_and_update_seq(seq) {
            warn!(seq, last = ?self.last_seq, "non-increasing seq");
            return ServerMessage::error(
                seq,
                ErrorCode::InvalidSeq,
                "seq must be strictly increasing",
            );
        }

        match msg {
            ClientMessage::NewGame {
                difficulty,
                hints,
                seed,
                ..
            } => {
                let difficulty = match difficulty.as_deref() {
                    None => Difficulty::default(),
                    Some(name) => match Difficulty::from_str(name) {
                        Some(d) => d,
                        None => {
                            return ServerMessage::error(
                                seq,
                                ErrorCode::InvalidDifficulty,
                                format!("unknown difficulty {:?}", name),
                            )
                        }
                    },
                };
                let mut options = GameOptions::new(difficulty);
                options.hints_enabled = hints;
                options.seed = seed;
                self.engine.new_game(options);
                self.state(seq)
            }
            ClientMessage::Place {
                block,
                row,
                col,
                rotation,
                ..
            } => {
                let rotation = match rotation {
                    None => None,
                    Some(deg) => match Rotation::from_degrees(deg) {
                        Some(r) => Some(r),
                        None => {
                            return ServerMessage::error(
                                seq,
                                ErrorCode::InvalidRotation,
                                format!("rotation {} is not a multiple of 90 below 360", deg),
                            )
                        }
                    },
                };
                match apply_place_rotated(&mut self.engine, block, rotation, row, col) {
                    Ok(result) => ServerMessage::Placed {
                        seq,
                        ts: current_timestamp_ms(),
                        placement: PlacementDto::from(&result),
                    },
                    Err(err) => command_error(seq, err),
                }
            }
            ClientMessage::Hint { .. } => ServerMessage::Hint {
                seq,
                ts: current_timestamp_ms(),
                hint: HintDto::from(self.engine.hint()),
            },
            ClientMessage::State { .. } => self.state(seq),
            ClientMessage::CheckGameOver { .. } => {
                ServerMessage::game_over(seq, self.engine.check_game_over())
            }
            ClientMessage::Save { .. } => ServerMessage::Saved {
                seq,
                ts: current_timestamp_ms(),
                game: SavedGame::from_snapshot(&self.engine.snapshot()),
            },
            ClientMessage::Load { game, .. } => {
                let restored = validate_saved(&game)
                    .map_err(|e| e.to_string())
                    .and_then(|snap| self.engine.restore(&snap).map_err(|e| e.to_string()));
                match restored {
                    Ok(()) => ServerMessage::Loaded {
                        seq,
                        ts: current_timestamp_ms(),
                        state: StateDto::from(&self.engine.snapshot()),
                    },
                    Err(message) => ServerMessage::error(seq, ErrorCode::InvalidSave, message),
                }
            }
        }
    }

    fn state(&self, seq: u64) -> ServerMessage {
        ServerMessage::State {
            seq,
            ts: current_timestamp_ms(),
            state: StateDto::from(&self.engine.snapshot()),
        }
    }
}

fn command_error(seq: u64, err: CommandError) -> ServerMessage {
    let code = ErrorCode::from_code(err.code()).unwrap_or(ErrorCode::InvalidJson);
    ServerMessage::error(seq, code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(msg: &ServerMessage) -> Option<ErrorCode> {
        match msg {
            ServerMessage::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    #[test]
    fn test_state_request() {
        let mut session = Session::new(1);
        let reply = session.handle_line(r#"{"type":"state","seq":1}"#);
        let ServerMessage::State { seq, state, .. } = reply else {
            panic!("expected state, got {:?}", reply);
        };
        assert_eq!(seq, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.blocks.len(), 3);
    }

    #[test]
    fn test_seq_must_increase() {
        let mut session = Session::new(1);
        session.handle_line(r#"{"type":"state","seq":5}"#);
        let reply = session.handle_line(r#"{"type":"state","seq":5}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::InvalidSeq));
        let reply = session.handle_line(r#"{"type":"state","seq":6}"#);
        assert_eq!(code_of(&reply), None);
    }

    #[test]
    fn test_invalid_json_echoes_seq() {
        let mut session = Session::new(1);
        let reply = session.handle_line(r#"{"type":"place","seq":12,"block":"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::InvalidJson));
        assert_eq!(reply.seq(), 12);
    }

    #[test]
    fn test_place_and_errors() {
        let mut session = Session::new(4);
        let reply = session.handle_line(r#"{"type":"place","seq":1,"block":0,"row":0,"col":0}"#);
        assert!(matches!(reply, ServerMessage::Placed { .. }), "{:?}", reply);

        let reply = session.handle_line(r#"{"type":"place","seq":2,"block":9,"row":0,"col":0}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::UnknownBlock));

        let reply = session.handle_line(r#"{"type":"place","seq":3,"block":0,"row":-1,"col":0}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::OutOfBounds));

        let reply = session
            .handle_line(r#"{"type":"place","seq":4,"block":0,"row":3,"col":3,"rotation":45}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::InvalidRotation));
    }

    #[test]
    fn test_place_on_full_board_collides() {
        let mut session = Session::new(4);
        let mut game = SavedGame::from_snapshot(&session.engine().snapshot());
        game.game.board = [[1; 9]; 9];
        let reply = session.handle(ClientMessage::Load { seq: 1, game });
        assert!(matches!(reply, ServerMessage::Loaded { .. }), "{:?}", reply);

        let reply = session.handle_line(r#"{"type":"place","seq":2,"block":0,"row":0,"col":0}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::Collision));

        let reply = session.handle_line(r#"{"type":"check_game_over","seq":3}"#);
        assert!(matches!(
            reply,
            ServerMessage::GameOver {
                is_game_over: true,
                ..
            }
        ));
        let reply = session.handle_line(r#"{"type":"place","seq":4,"block":0,"row":0,"col":0}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::GameOver));
    }

    #[test]
    fn test_new_game_with_options() {
        let mut session = Session::new(1);
        let reply = session.handle_line(
            r#"{"type":"new_game","seq":1,"difficulty":"expert","hints":true,"seed":77}"#,
        );
        let ServerMessage::State { state, .. } = reply else {
            panic!("expected state");
        };
        assert_eq!(state.difficulty, "expert");
        assert!(state.hints_enabled);
        assert_eq!(state.episode_id, 1);

        let reply = session.handle_line(r#"{"type":"new_game","seq":2,"difficulty":"insane"}"#);
        assert_eq!(code_of(&reply), Some(ErrorCode::InvalidDifficulty));
    }

    #[test]
    fn test_hint_respects_setting() {
        let mut session = Session::new(1);
        session.handle_line(r#"{"type":"new_game","seq":1,"difficulty":"hard"}"#);
        let reply = session.handle_line(r#"{"type":"hint","seq":2}"#);
        let ServerMessage::Hint { hint, .. } = reply else {
            panic!("expected hint");
        };
        assert!(!hint.available);

        session.handle_line(r#"{"type":"new_game","seq":3,"difficulty":"easy"}"#);
        let reply = session.handle_line(r#"{"type":"hint","seq":4}"#);
        let ServerMessage::Hint { hint, .. } = reply else {
            panic!("expected hint");
        };
        assert!(hint.available);
        assert!(hint.expected_score.unwrap() > 0);
    }

    #[test]
    fn test_save_and_load_between_sessions() {
        let mut a = Session::new(3);
        a.handle_line(r#"{"type":"place","seq":1,"block":0,"row":2,"col":2}"#);
        let ServerMessage::Saved { game, .. } = a.handle_line(r#"{"type":"save","seq":2}"#) else {
            panic!("expected saved");
        };

        let mut b = Session::new(99);
        let load = ClientMessage::Load { seq: 1, game };
        let reply = b.handle(load);
        assert!(matches!(reply, ServerMessage::Loaded { .. }), "{:?}", reply);
        assert_eq!(b.engine().snapshot(), a.engine().snapshot());
    }

    #[test]
    fn test_load_rejects_bad_save() {
        let mut session = Session::new(3);
        let mut game = SavedGame::from_snapshot(&session.engine().snapshot());
        game.game.level = 0;
        let reply = session.handle(ClientMessage::Load { seq: 1, game });
        assert_eq!(code_of(&reply), Some(ErrorCode::InvalidSave));
    }

    #[test]
    fn test_check_game_over_running() {
        let mut session = Session::new(3);
        let reply = session.handle_line(r#"{"type":"check_game_over","seq":1}"#);
        assert!(matches!(
            reply,
            ServerMessage::GameOver {
                is_game_over: false,
                ..
            }
        ));
    }
}
