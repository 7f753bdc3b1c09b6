//! Scripted host: serves snapshots of the current screen and applies
//! click-driven navigation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use autoleave_app::ports::{Snapshot, TreeSource};
use autoleave_domain::error::{AutomationError, HostError};
use autoleave_domain::node::{Bounds, UiNode};

use crate::error::ScriptError;
use crate::tree::{NodeData, ScreenSpec, VirtualTree};

/// One click accepted by the virtual host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    /// Screen the click happened on.
    pub screen: usize,
    /// Text, description, or class of the clicked node, whichever is set
    /// first.
    pub label: String,
}

#[derive(Debug, Default)]
struct Shared {
    current: Mutex<usize>,
    clicks: Mutex<Vec<ClickRecord>>,
    surface_available: AtomicBool,
    connected: AtomicBool,
    taken: AtomicUsize,
    released: AtomicUsize,
}

impl Shared {
    fn current(&self) -> MutexGuard<'_, usize> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clicks(&self) -> MutexGuard<'_, Vec<ClickRecord>> {
        self.clicks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`TreeSource`] backed by an in-memory screen script.
#[derive(Debug)]
pub struct ScriptedHost {
    screens: Vec<Arc<VirtualTree>>,
    shared: Arc<Shared>,
}

impl ScriptedHost {
    /// Build a host showing the first screen of `screens`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Empty`] for an empty script and
    /// [`ScriptError::MissingTarget`] when a node navigates past the end.
    pub fn new(screens: &[ScreenSpec]) -> Result<Self, ScriptError> {
        if screens.is_empty() {
            return Err(ScriptError::Empty);
        }
        for (screen, spec) in screens.iter().enumerate() {
            if let Some(target) = spec
                .navigation_targets()
                .into_iter()
                .find(|&target| target >= screens.len())
            {
                return Err(ScriptError::MissingTarget { screen, target });
            }
        }

        let shared = Shared {
            surface_available: AtomicBool::new(true),
            connected: AtomicBool::new(true),
            ..Shared::default()
        };
        Ok(Self {
            screens: screens.iter().map(VirtualTree::build).map(Arc::new).collect(),
            shared: Arc::new(shared),
        })
    }

    /// Parse a JSON array of screens.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] for malformed JSON, or any error of
    /// [`ScriptedHost::new`].
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let screens: Vec<ScreenSpec> = serde_json::from_str(json)?;
        Self::new(&screens)
    }

    /// Read and parse a JSON screen script from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Io`] if the file cannot be read, or any error
    /// of [`ScriptedHost::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Index of the screen currently in the foreground.
    #[must_use]
    pub fn current_screen(&self) -> usize {
        *self.shared.current()
    }

    /// Bring screen `index` to the foreground. Out-of-range indices are ignored.
    pub fn set_screen(&self, index: usize) {
        if index < self.screens.len() {
            *self.shared.current() = index;
        }
    }

    /// Simulate the foreground surface disappearing (or coming back).
    pub fn set_surface_available(&self, available: bool) {
        self.shared
            .surface_available
            .store(available, Ordering::SeqCst);
    }

    /// Simulate the host service unbinding (or binding again).
    ///
    /// While disconnected every snapshot request fails with
    /// [`HostError::Disconnected`].
    pub fn set_connected(&self, connected: bool) {
        self.shared.connected.store(connected, Ordering::SeqCst);
    }

    /// Every click accepted so far, in order.
    #[must_use]
    pub fn clicks(&self) -> Vec<ClickRecord> {
        self.shared.clicks().clone()
    }

    /// Snapshots handed out and not yet dropped.
    #[must_use]
    pub fn outstanding_snapshots(&self) -> usize {
        self.shared.taken.load(Ordering::SeqCst) - self.shared.released.load(Ordering::SeqCst)
    }

    /// Number of screens in the script.
    #[must_use]
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }
}

impl TreeSource for ScriptedHost {
    type Snapshot = VirtualSnapshot;

    fn snapshot(&self) -> Result<Option<VirtualSnapshot>, AutomationError> {
        if !self.shared.connected.load(Ordering::SeqCst) {
            return Err(HostError::Disconnected.into());
        }
        if !self.shared.surface_available.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let screen = self.current_screen();
        self.shared.taken.fetch_add(1, Ordering::SeqCst);
        Ok(Some(VirtualSnapshot {
            screen,
            tree: Arc::clone(&self.screens[screen]),
            shared: Arc::clone(&self.shared),
        }))
    }
}

/// The tree of one screen, captured for one tick.
///
/// Dropping the snapshot releases it back to the host.
#[derive(Debug)]
pub struct VirtualSnapshot {
    screen: usize,
    tree: Arc<VirtualTree>,
    shared: Arc<Shared>,
}

impl VirtualSnapshot {
    /// Index of the screen this snapshot was taken from.
    #[must_use]
    pub fn screen(&self) -> usize {
        self.screen
    }
}

impl Drop for VirtualSnapshot {
    fn drop(&mut self) {
        self.shared.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl Snapshot for VirtualSnapshot {
    type Node<'a> = VirtualNode<'a>;

    fn package_name(&self) -> Option<&str> {
        Some(self.tree.package())
    }

    fn root(&self) -> VirtualNode<'_> {
        VirtualNode {
            snapshot: self,
            index: 0,
        }
    }
}

/// Handle to one node of a [`VirtualSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct VirtualNode<'a> {
    snapshot: &'a VirtualSnapshot,
    index: usize,
}

impl<'a> VirtualNode<'a> {
    fn data(&self) -> &'a NodeData {
        self.snapshot.tree.node(self.index)
    }

    fn at(&self, index: usize) -> Self {
        Self {
            snapshot: self.snapshot,
            index,
        }
    }

    fn label(&self) -> String {
        let data = self.data();
        data.text
            .as_deref()
            .or(data.description.as_deref())
            .or(data.class_name.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}

impl UiNode for VirtualNode<'_> {
    fn text(&self) -> Option<&str> {
        self.data().text.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.data().description.as_deref()
    }

    fn class_name(&self) -> Option<&str> {
        self.data().class_name.as_deref()
    }

    fn bounds(&self) -> Bounds {
        self.data().bounds
    }

    fn is_clickable(&self) -> bool {
        self.data().clickable
    }

    fn is_enabled(&self) -> bool {
        self.data().enabled
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|index| self.at(index))
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&index| self.at(index))
            .collect()
    }

    fn perform_click(&self) -> bool {
        let data = self.data();
        if !data.clickable || !data.enabled {
            tracing::trace!(label = %self.label(), "virtual host rejected click");
            return false;
        }

        let shared = &self.snapshot.shared;
        shared.clicks().push(ClickRecord {
            screen: self.snapshot.screen,
            label: self.label(),
        });
        if let Some(target) = data.navigates_to {
            tracing::debug!(from = self.snapshot.screen, to = target, "virtual host navigating");
            *shared.current() = target;
        }
        true
    }
}
