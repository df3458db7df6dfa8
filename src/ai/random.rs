use crate::error::SearchError;
use crate::game::GameState;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible agent for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, state: &GameState) -> Result<Option<usize>, SearchError> {
        let actions = state.legal_actions();
        if actions.is_empty() {
            return Ok(None);
        }
        let idx = self.rng.random_range(0..actions.len());
        Ok(Some(actions[idx]))
    }

    fn name(&self) -> &str {
        "Random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Player};

    #[test]
    fn test_random_agent_selects_legal_action() {
        let mut agent = RandomAgent::new();
        let board = Board::from_rows(&["X.X.", "O.O.", "XOXO"]).unwrap();
        let state = GameState::from_board(board, Player::Human);
        let legal = state.legal_actions();
        assert_eq!(legal, vec![1, 3]);

        for _ in 0..100 {
            let action = agent.select_action(&state).unwrap().unwrap();
            assert!(legal.contains(&action), "Action {} is not legal", action);
        }
    }

    #[test]
    fn test_random_agent_plays_full_game() {
        let mut agent1 = RandomAgent::seeded(1);
        let mut agent2 = RandomAgent::seeded(2);
        let mut state = GameState::new(6, 7, Player::Human).unwrap();

        let mut turn = 0;
        while !state.is_terminal() {
            let action = if turn % 2 == 0 {
                agent1.select_action(&state)
            } else {
                agent2.select_action(&state)
            };
            state = state.apply_move(action.unwrap().unwrap()).unwrap();
            turn += 1;
        }

        assert!(state.is_terminal());
        assert!(state.outcome().is_some());
        assert_eq!(agent1.select_action(&state), Ok(None));
    }

    #[test]
    fn test_seeded_agents_agree() {
        let state = GameState::new(6, 7, Player::Computer).unwrap();
        let picks = |seed| {
            let mut agent = RandomAgent::seeded(seed);
            (0..10)
                .map(|_| agent.select_action(&state).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_random_agent_name() {
        let agent = RandomAgent::new();
        assert_eq!(agent.name(), "Random");
    }
}
