//! Step: position in the leave-group cycle.

use serde::{Deserialize, Serialize};

/// One stage of the detect → open → menu → leave → confirm cycle.
///
/// The cycle has no terminal state: [`Complete`](Self::Complete) always
/// leads back to [`Detect`](Self::Detect).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Look for a group whose name matches a keyword and open it.
    #[default]
    Detect,
    /// Open the group's detail screen.
    OpenDetail,
    /// Open the overflow menu.
    OpenMenu,
    /// Press the leave entry.
    Leave,
    /// Confirm the leave dialog.
    Confirm,
    /// Cycle finished; reset on the next tick.
    Complete,
}

impl Step {
    /// All steps in cycle order.
    pub const ALL: [Self; 6] = [
        Self::Detect,
        Self::OpenDetail,
        Self::OpenMenu,
        Self::Leave,
        Self::Confirm,
        Self::Complete,
    ];

    /// The step that follows a successful action.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Detect => Self::OpenDetail,
            Self::OpenDetail => Self::OpenMenu,
            Self::OpenMenu => Self::Leave,
            Self::Leave => Self::Confirm,
            Self::Confirm => Self::Complete,
            Self::Complete => Self::Detect,
        }
    }

    /// Numeric position, `0..=5`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Detect => 0,
            Self::OpenDetail => 1,
            Self::OpenMenu => 2,
            Self::Leave => 3,
            Self::Confirm => 4,
            Self::Complete => 5,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detect => f.write_str("detect"),
            Self::OpenDetail => f.write_str("open_detail"),
            Self::OpenMenu => f.write_str("open_menu"),
            Self::Leave => f.write_str("leave"),
            Self::Confirm => f.write_str("confirm"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_detect() {
        assert_eq!(Step::default(), Step::Detect);
    }

    #[test]
    fn should_cycle_back_to_detect_after_six_steps() {
        let mut step = Step::Detect;
        for expected in Step::ALL.iter().skip(1) {
            step = step.next();
            assert_eq!(step, *expected);
        }
        assert_eq!(step.next(), Step::Detect);
    }

    #[test]
    fn should_number_steps_in_cycle_order() {
        let indices: Vec<u8> = Step::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn should_display_snake_case_name() {
        assert_eq!(Step::OpenDetail.to_string(), "open_detail");
        assert_eq!(Step::Complete.to_string(), "complete");
    }

    #[test]
    fn should_serialize_like_display() {
        let json = serde_json::to_string(&Step::OpenMenu).unwrap();
        assert_eq!(json, "\"open_menu\"");
    }
}
