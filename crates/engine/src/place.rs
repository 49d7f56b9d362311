use tetris_duel_core::pieces::orientation_count;
use tetris_duel_core::{Placement, Session, SessionEvent};

use crate::types::BOARD_WIDTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    HoldUnavailable,
    UnknownOrientation,
    RotationBlocked,
    XOutOfBounds,
    XBlocked,
    NotPlayable,
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::NotPlayable => "not_playable",
            PlaceError::UnknownOrientation
            | PlaceError::RotationBlocked
            | PlaceError::XOutOfBounds
            | PlaceError::XBlocked
            | PlaceError::NoActive => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold requested when unavailable",
            PlaceError::UnknownOrientation => "piece has no such orientation",
            PlaceError::RotationBlocked => "could not rotate to target orientation",
            PlaceError::XOutOfBounds => "target x would place piece out of bounds",
            PlaceError::XBlocked => "could not move to target x due to collision",
            PlaceError::NotPlayable => "board has topped out",
            PlaceError::NoActive => "no active piece",
        }
    }
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for PlaceError {}

/// Rotate to `target.orientation`, shift to `target.x`, then hard drop
///
/// Every step goes through the same legality checks as player input, so
/// rotation never kicks. On error the session is left exactly as it was.
pub fn apply_place(
    session: &mut Session,
    target: Placement,
    use_hold: bool,
) -> Result<SessionEvent, PlaceError> {
    let before = session.clone();
    let result = place_steps(session, target, use_hold);
    if result.is_err() {
        *session = before;
    }
    result
}

fn place_steps(
    session: &mut Session,
    target: Placement,
    use_hold: bool,
) -> Result<SessionEvent, PlaceError> {
    if session.topped_out() {
        return Err(PlaceError::NotPlayable);
    }

    if use_hold && !session.hold() {
        return Err(PlaceError::HoldUnavailable);
    }

    let Some(active0) = session.current() else {
        return Err(PlaceError::NoActive);
    };

    let count = orientation_count(active0.kind) as i16;
    if target.orientation as i16 >= count {
        return Err(PlaceError::UnknownOrientation);
    }

    // Forward or backward, shorter first; a half turn tries both ways.
    let cur = active0.orientation as i16;
    let tgt = target.orientation as i16;
    let forward = (tgt - cur).rem_euclid(count);
    let backward = (cur - tgt).rem_euclid(count);
    let mut plans = [(1i8, forward), (-1i8, backward)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    let start = session.clone();
    let mut rotated = false;
    for (direction, steps) in plans {
        *session = start.clone();
        if (0..steps).all(|_| session.try_rotate(direction)) {
            rotated = true;
            break;
        }
    }
    if !rotated {
        return Err(PlaceError::RotationBlocked);
    }

    let Some(active) = session.current() else {
        return Err(PlaceError::NoActive);
    };
    if active.orientation != target.orientation {
        return Err(PlaceError::RotationBlocked);
    }

    let Some((min_dx, max_dx)) = active.column_span() else {
        return Err(PlaceError::UnknownOrientation);
    };
    let left = target.x as i16 + min_dx as i16;
    let right = target.x as i16 + max_dx as i16;
    if left < 0 || right >= BOARD_WIDTH as i16 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target.x - active.x;
    let step = dx.signum();
    for _ in 0..dx.unsigned_abs() {
        if !session.try_move(step, 0) {
            return Err(PlaceError::XBlocked);
        }
    }

    session.hard_drop().ok_or(PlaceError::NoActive)
}
