//! Target profile: everything the step machine needs to know about the
//! target application's screens.
//!
//! Labels are localized and the screen layout changes between releases of
//! the target application, so none of them are hard-coded in the step
//! machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AutomationError, ValidationError};

/// Screen texts, widget classes and delays for one target application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// Package identifier the foreground surface must belong to.
    pub package: String,
    /// Texts identifying the group header on the chat screen
    /// (invite-link shaped first, then label shaped).
    pub group_link_markers: Vec<String>,
    /// Texts whose presence proves the detail screen is showing.
    pub detail_indicators: Vec<String>,
    /// Accessible-description fragments of the overflow ("more") button.
    pub menu_markers: Vec<String>,
    /// Widget class of unlabeled icons scored by position.
    pub icon_class: String,
    /// Text of the leave entry in the overflow menu.
    pub leave_label: String,
    /// Text of the confirmation button.
    pub confirm_label: String,
    /// Debounce after a transition before the next step may act, in ms.
    pub step_delay_ms: u64,
    /// Settle delay between first detection and the click in step 0, in ms.
    pub group_click_delay_ms: u64,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            package: "com.discord".to_string(),
            group_link_markers: vec!["discord.gg".to_string(), "グループ名".to_string()],
            detail_indicators: vec![
                "メンバー".to_string(),
                "ピン留め".to_string(),
                "リンク".to_string(),
                "メディア".to_string(),
            ],
            menu_markers: vec!["その他".to_string(), "メニュー".to_string(), "more".to_string()],
            icon_class: "android.widget.ImageView".to_string(),
            leave_label: "グループから脱退する".to_string(),
            confirm_label: "はい".to_string(),
            step_delay_ms: 500,
            group_click_delay_ms: 500,
        }
    }
}

impl TargetProfile {
    #[must_use]
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    #[must_use]
    pub fn group_click_delay(&self) -> Duration {
        Duration::from_millis(self.group_click_delay_ms)
    }

    /// Check that every text the step machine searches for is usable.
    ///
    /// Delays may be zero (no debounce); texts may not, since an empty
    /// needle matches every node.
    ///
    /// # Errors
    ///
    /// Returns [`AutomationError::Validation`] for an empty package, label,
    /// class, list, or list entry.
    pub fn validate(&self) -> Result<(), AutomationError> {
        non_empty("package", &self.package)?;
        non_empty("icon_class", &self.icon_class)?;
        non_empty("leave_label", &self.leave_label)?;
        non_empty("confirm_label", &self.confirm_label)?;
        non_empty_list("group_link_markers", &self.group_link_markers)?;
        non_empty_list("detail_indicators", &self.detail_indicators)?;
        non_empty_list("menu_markers", &self.menu_markers)?;
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

fn non_empty_list(field: &'static str, values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptyList { field });
    }
    values.iter().try_for_each(|value| non_empty(field, value))
}
