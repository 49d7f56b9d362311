//! Driver configuration from the environment.

use std::time::Duration;

use crate::core::MatchConfig;
use crate::types::{DROP_INTERVAL_MS, SCHEDULER_TICK_MS, THINK_INTERVAL_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelConfig {
    /// Player seed; the opponent uses `seed + 1`.
    pub seed: u32,
    pub tick_ms: u32,
    pub drop_ms: u32,
    pub think_ms: u32,
    /// JSON-lines event log; `None` disables it.
    pub log_path: Option<String>,
    pub max_pending_actions: usize,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            tick_ms: SCHEDULER_TICK_MS,
            drop_ms: DROP_INTERVAL_MS,
            think_ms: THINK_INTERVAL_MS,
            log_path: None,
            max_pending_actions: 64,
        }
    }
}

impl DuelConfig {
    /// Read `TETRIS_DUEL_*` variables; anything missing or unparseable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u32>().ok());

        let log_path = lookup("TETRIS_DUEL_LOG_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            seed: parse("TETRIS_DUEL_SEED").unwrap_or(defaults.seed),
            tick_ms: parse("TETRIS_DUEL_TICK_MS")
                .filter(|&ms| ms > 0)
                .unwrap_or(defaults.tick_ms),
            drop_ms: parse("TETRIS_DUEL_DROP_MS").unwrap_or(defaults.drop_ms),
            think_ms: parse("TETRIS_DUEL_THINK_MS").unwrap_or(defaults.think_ms),
            log_path,
            max_pending_actions: defaults.max_pending_actions,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1) as u64)
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            drop_interval_ms: self.drop_ms,
            think_interval_ms: self.think_ms,
            ..MatchConfig::with_seed(self.seed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> DuelConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DuelConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), DuelConfig::default());
    }

    #[test]
    fn parses_every_variable() {
        let config = config_from(&[
            ("TETRIS_DUEL_SEED", "42"),
            ("TETRIS_DUEL_TICK_MS", "20"),
            ("TETRIS_DUEL_DROP_MS", " 500 "),
            ("TETRIS_DUEL_THINK_MS", "100"),
            ("TETRIS_DUEL_LOG_PATH", "/tmp/duel.jsonl"),
        ]);
        assert_eq!(config.seed, 42);
        assert_eq!(config.tick_ms, 20);
        assert_eq!(config.drop_ms, 500);
        assert_eq!(config.think_ms, 100);
        assert_eq!(config.log_path.as_deref(), Some("/tmp/duel.jsonl"));

        let m = config.match_config();
        assert_eq!((m.player_seed, m.opponent_seed), (42, 43));
        assert_eq!(m.drop_interval_ms, 500);
        assert_eq!(m.clear_flash_ms, 300);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config_from(&[
            ("TETRIS_DUEL_SEED", "abc"),
            ("TETRIS_DUEL_TICK_MS", "0"),
            ("TETRIS_DUEL_LOG_PATH", "   "),
        ]);
        assert_eq!(config.seed, 1);
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.log_path, None);
    }
}
