use super::direction::Direction;

/// Buffers the next direction change between ticks
///
/// Holds a single slot rather than a queue: the snake turns at most once per
/// tick, so a later valid proposal replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    pending: Option<Direction>,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `raw` against the current heading, rejecting reversals
    pub fn propose(raw: Direction, current: Direction) -> Direction {
        if raw.is_opposite(current) {
            current
        } else {
            raw
        }
    }

    /// Record a proposal; reversals leave the pending slot untouched
    pub fn submit(&mut self, raw: Direction, current: Direction) {
        if !raw.is_opposite(current) {
            self.pending = Some(raw);
        }
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Drain the slot at the start of a tick
    pub fn resolve(&mut self, current: Direction) -> Direction {
        self.pending
            .take()
            .map(|raw| Self::propose(raw, current))
            .unwrap_or(current)
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propose_rejects_reversal() {
        assert_eq!(
            InputTranslator::propose(Direction::Left, Direction::Right),
            Direction::Right
        );
        assert_eq!(
            InputTranslator::propose(Direction::Up, Direction::Right),
            Direction::Up
        );
        assert_eq!(
            InputTranslator::propose(Direction::Right, Direction::Right),
            Direction::Right
        );
    }

    #[test]
    fn test_latest_valid_proposal_wins() {
        let mut translator = InputTranslator::new();
        translator.submit(Direction::Up, Direction::Right);
        translator.submit(Direction::Down, Direction::Right);

        assert_eq!(translator.resolve(Direction::Right), Direction::Down);
    }

    #[test]
    fn test_reversal_does_not_overwrite_pending() {
        let mut translator = InputTranslator::new();
        translator.submit(Direction::Up, Direction::Right);
        translator.submit(Direction::Left, Direction::Right);

        assert_eq!(translator.pending(), Some(Direction::Up));
        assert_eq!(translator.resolve(Direction::Right), Direction::Up);
    }

    #[test]
    fn test_resolve_drains_slot() {
        let mut translator = InputTranslator::new();
        translator.submit(Direction::Down, Direction::Left);

        assert_eq!(translator.resolve(Direction::Left), Direction::Down);
        assert_eq!(translator.resolve(Direction::Down), Direction::Down);
        assert_eq!(translator.pending(), None);
    }

    #[test]
    fn test_clear() {
        let mut translator = InputTranslator::new();
        translator.submit(Direction::Down, Direction::Left);
        translator.clear();

        assert_eq!(translator.resolve(Direction::Left), Direction::Left);
    }
}
