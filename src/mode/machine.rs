use super::{DrawMode, ModeEvent, ModeTransition};

/// Fully connected mode graph: every mode can follow every other, and re-entering the
/// current mode is a transition too. Only explicit events move it.
#[derive(Debug)]
pub struct ModeMachine {
    mode: DrawMode,
    transition_history: Vec<ModeTransition>,
}

impl ModeMachine {
    pub fn new(initial: DrawMode) -> Self {
        Self {
            mode: initial,
            transition_history: Vec::new(),
        }
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn transition(&mut self, event: ModeEvent) -> DrawMode {
        let next = event.target();
        tracing::debug!(from = ?self.mode, event = ?event, to = ?next, "mode transition");
        self.transition_history
            .push(ModeTransition::new(self.mode, event, next));
        self.mode = next;
        self.mode
    }

    pub fn history(&self) -> &[ModeTransition] {
        &self.transition_history
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new(DrawMode::default())
    }
}

impl std::fmt::Display for ModeMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DrawMode::{}", self.mode)
    }
}
