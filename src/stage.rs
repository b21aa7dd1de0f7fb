use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("stage count must be at least 1 (got {0})")]
    Configuration(i64),
    #[error("{0}")]
    InvalidInput(String),
}

/// Startup configuration, validated once at construction. The number of
/// stages never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageConfig {
    max_stage: usize,
}

impl StageConfig {
    pub fn from_stage_count(count: i64) -> Result<Self, NavigationError> {
        if count < 1 {
            return Err(NavigationError::Configuration(count));
        }
        Ok(Self {
            max_stage: (count - 1) as usize,
        })
    }

    pub fn max_stage(&self) -> usize {
        self.max_stage
    }

    pub fn stage_count(&self) -> usize {
        self.max_stage + 1
    }
}

/// The value published to subscribers. Each accepted transition produces a
/// new value; nothing mutates a state in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigationState {
    current_stage: usize,
}

impl NavigationState {
    pub fn current_stage(&self) -> usize {
        self.current_stage
    }
}

/// Signed step declared by a navigation control. Negative goes back,
/// positive goes forward; zero is not a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Direction(i64);

impl Direction {
    pub fn new(delta: i64) -> Result<Self, NavigationError> {
        if delta == 0 {
            return Err(NavigationError::InvalidInput(
                "a navigation direction must be a non-zero integer".into(),
            ));
        }
        Ok(Self(delta))
    }

    /// Parses a direction from a loosely-typed declaration (e.g. a control
    /// label on the command line). Non-integer values are rejected rather
    /// than coerced to zero.
    pub fn parse(raw: &str) -> Result<Self, NavigationError> {
        let delta = raw.trim().parse::<i64>().map_err(|_| {
            NavigationError::InvalidInput(format!(
                "navigation direction {raw:?} must be an integer"
            ))
        })?;
        Self::new(delta)
    }

    pub fn delta(self) -> i64 {
        self.0
    }

    pub fn goes_back(self) -> bool {
        self.0 < 0
    }
}

type StateCallback = Box<dyn FnMut(NavigationState)>;

/// Single owner of the current stage. All transitions flow through
/// `request_move`/`request_set`; subscribers are notified synchronously, in
/// registration order, once per transition that actually changed the stage.
pub struct StageController {
    config: StageConfig,
    state: NavigationState,
    subscribers: Vec<StateCallback>,
}

impl StageController {
    pub fn new(config: StageConfig) -> Self {
        Self {
            config,
            state: NavigationState { current_stage: 0 },
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    pub fn config(&self) -> StageConfig {
        self.config
    }

    pub fn subscribe(&mut self, callback: impl FnMut(NavigationState) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    /// Relative move. The candidate stage is clamped to `[0, max_stage]`,
    /// so repeated presses at a boundary are silent no-ops.
    pub fn request_move(&mut self, delta: i64) -> Result<NavigationState, NavigationError> {
        if delta == 0 {
            return Err(NavigationError::InvalidInput(
                "a relative move must be a non-zero integer".into(),
            ));
        }
        let candidate = (self.state.current_stage as i64).saturating_add(delta);
        let clamped = candidate.clamp(0, self.config.max_stage as i64) as usize;
        Ok(self.apply(clamped))
    }

    /// Absolute move. Targets above the maximum clamp; negative targets are
    /// rejected outright since an absolute set comes from code, not from a
    /// user leaning on a button.
    pub fn request_set(&mut self, target: i64) -> Result<NavigationState, NavigationError> {
        if target < 0 {
            return Err(NavigationError::InvalidInput(format!(
                "cannot set negative stage {target}"
            )));
        }
        let clamped = (target as usize).min(self.config.max_stage);
        Ok(self.apply(clamped))
    }

    fn apply(&mut self, stage: usize) -> NavigationState {
        if stage == self.state.current_stage {
            return self.state;
        }
        self.state = NavigationState {
            current_stage: stage,
        };
        for subscriber in &mut self.subscribers {
            subscriber(self.state);
        }
        self.state
    }
}
