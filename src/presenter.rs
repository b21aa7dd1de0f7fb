use crate::stage::{Direction, NavigationState, StageConfig};

/// A surface showing stage-specific content, one pane per stage. Targets may
/// be sparse: a pane can be missing for some stages.
pub trait DisplayTarget {
    fn pane_count(&self) -> usize;
    /// Marker driving the cross-fade; updated on every state change.
    fn set_visible_stage(&mut self, stage: usize);
    /// Marks one pane as current and clears the mark from all others.
    /// `None` clears the mark without setting a new one.
    fn set_current_pane(&mut self, pane: Option<usize>);
}

/// A navigation control with a settable enabled/disabled flag.
pub trait NavControl {
    fn set_enabled(&mut self, enabled: bool);
}

struct TargetEntry {
    id: String,
    target: Box<dyn DisplayTarget>,
}

struct ControlBinding {
    id: String,
    control: Box<dyn NavControl>,
    direction: Direction,
    applied: Option<bool>,
}

/// Projects `NavigationState` onto every registered display target and
/// control. Enablement is only written when it actually changed.
pub struct NavigationPresenter {
    max_stage: usize,
    targets: Vec<TargetEntry>,
    controls: Vec<ControlBinding>,
}

impl NavigationPresenter {
    pub fn new(config: StageConfig) -> Self {
        Self {
            max_stage: config.max_stage(),
            targets: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// No-op if a target with this id is already registered.
    pub fn register_display_target(&mut self, id: impl Into<String>, target: Box<dyn DisplayTarget>) {
        let id = id.into();
        if self.targets.iter().any(|entry| entry.id == id) {
            return;
        }
        self.targets.push(TargetEntry { id, target });
    }

    pub fn unregister_display_target(&mut self, id: &str) {
        self.targets.retain(|entry| entry.id != id);
    }

    /// No-op if a control with this id is already registered.
    pub fn register_control(
        &mut self,
        id: impl Into<String>,
        control: Box<dyn NavControl>,
        direction: Direction,
    ) {
        let id = id.into();
        if self.controls.iter().any(|binding| binding.id == id) {
            return;
        }
        self.controls.push(ControlBinding {
            id,
            control,
            direction,
            applied: None,
        });
    }

    pub fn unregister_control(&mut self, id: &str) {
        self.controls.retain(|binding| binding.id != id);
    }

    pub fn on_state_change(&mut self, state: NavigationState) {
        let stage = state.current_stage();

        for entry in &mut self.targets {
            entry.target.set_visible_stage(stage);
            if stage < entry.target.pane_count() {
                entry.target.set_current_pane(Some(stage));
            } else {
                // Sparse target: clear the old mark, apply none.
                entry.target.set_current_pane(None);
            }
        }

        for binding in &mut self.controls {
            let enabled = if binding.direction.goes_back() {
                stage > 0
            } else {
                stage < self.max_stage
            };
            if binding.applied != Some(enabled) {
                binding.control.set_enabled(enabled);
                binding.applied = Some(enabled);
            }
        }
    }
}
