// ============================================================================
// Undo Window
// ============================================================================
//
// Expiry of a soft deletion is a pure function of (deleted_at, now, window),
// evaluated at restore time. No background job is needed for correctness;
// the purge task only reclaims storage.
//
// `now` must come from the server's clock, never from the request.
//
// ============================================================================

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoState {
    /// Not deleted
    Active,
    /// Deleted, restore still allowed for `remaining`
    Restorable { remaining: Duration },
    /// Deleted and the window has elapsed: behaves as gone
    Expired,
}

pub fn undo_state(
    deleted_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> UndoState {
    let Some(deleted_at) = deleted_at else {
        return UndoState::Active;
    };

    // A clock stepping backwards must not extend the window
    let elapsed = (now - deleted_at).max(Duration::zero());
    if elapsed < window {
        UndoState::Restorable {
            remaining: window - elapsed,
        }
    } else {
        UndoState::Expired
    }
}

pub fn restorable_until(deleted_at: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    deleted_at + window
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::seconds(5)
    }

    #[test]
    fn test_not_deleted_is_active() {
        assert_eq!(undo_state(None, Utc::now(), window()), UndoState::Active);
    }

    #[test]
    fn test_immediately_after_delete_is_restorable() {
        let now = Utc::now();
        assert_eq!(
            undo_state(Some(now), now, window()),
            UndoState::Restorable { remaining: window() }
        );
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let deleted_at = Utc::now();
        let just_before = deleted_at + window() - Duration::milliseconds(1);
        assert!(matches!(
            undo_state(Some(deleted_at), just_before, window()),
            UndoState::Restorable { .. }
        ));
        assert_eq!(
            undo_state(Some(deleted_at), deleted_at + window(), window()),
            UndoState::Expired
        );
    }

    #[test]
    fn test_clock_skew_does_not_extend_window() {
        let deleted_at = Utc::now();
        let earlier = deleted_at - Duration::seconds(30);
        assert_eq!(
            undo_state(Some(deleted_at), earlier, window()),
            UndoState::Restorable { remaining: window() }
        );
    }

    #[test]
    fn test_zero_window_never_restores() {
        let now = Utc::now();
        assert_eq!(undo_state(Some(now), now, Duration::zero()), UndoState::Expired);
    }
}
