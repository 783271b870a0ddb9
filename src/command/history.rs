use crate::element::SceneObject;

pub const DEFAULT_HISTORY_LIMIT: usize = 200;

/// Linear undo/redo over structural snapshots of the object list.
///
/// The state at `step` always equals the live list. Recording after an undo
/// discards everything past `step`, so redo is no longer possible.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    snapshots: Vec<Vec<SceneObject>>,
    step: usize,
    limit: usize,
}

impl CommandHistory {
    /// Starts a history whose first entry is `initial`, which may be empty.
    pub fn new(initial: &[SceneObject], limit: usize) -> Self {
        Self {
            snapshots: vec![initial.to_vec()],
            step: 0,
            limit: limit.max(1),
        }
    }

    /// Records the committed state of the list
    pub fn record(&mut self, objects: &[SceneObject]) {
        self.snapshots.truncate(self.step + 1);
        self.snapshots.push(objects.to_vec());
        if self.snapshots.len() > self.limit {
            let overflow = self.snapshots.len() - self.limit;
            self.snapshots.drain(..overflow);
        }
        self.step = self.snapshots.len() - 1;
    }

    /// Overwrites the current entry instead of adding one, folding a
    /// continuous edit into a single undo step. The initial entry is never
    /// overwritten.
    pub fn amend(&mut self, objects: &[SceneObject]) {
        if self.step == 0 {
            self.record(objects);
            return;
        }
        self.snapshots.truncate(self.step + 1);
        self.snapshots[self.step] = objects.to_vec();
    }

    /// Steps back and returns a copy of the state to restore
    pub fn undo(&mut self) -> Option<Vec<SceneObject>> {
        if !self.can_undo() {
            return None;
        }
        self.step -= 1;
        log::debug!("Undo to step {}", self.step);
        Some(self.snapshots[self.step].clone())
    }

    /// Steps forward and returns a copy of the state to restore
    pub fn redo(&mut self) -> Option<Vec<SceneObject>> {
        if !self.can_redo() {
            return None;
        }
        self.step += 1;
        log::debug!("Redo to step {}", self.step);
        Some(self.snapshots[self.step].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.step > 0
    }

    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.snapshots.len()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Forgets all history and starts over from `objects`
    pub fn reset(&mut self, objects: &[SceneObject]) {
        self.snapshots = vec![objects.to_vec()];
        self.step = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Vec2};

    fn rect(x: f32) -> SceneObject {
        SceneObject::rect(Pos2::new(x, 0.0), Vec2::splat(10.0))
    }

    #[test]
    fn undo_reaches_the_empty_canvas() {
        let mut history = CommandHistory::new(&[], DEFAULT_HISTORY_LIMIT);
        let state = vec![rect(0.0)];
        history.record(&state);
        assert_eq!(history.undo(), Some(Vec::new()));
        assert!(!history.can_undo());
        assert_eq!(history.redo(), Some(state));
    }

    #[test]
    fn new_edit_discards_redo_branch() {
        let mut history = CommandHistory::new(&[], DEFAULT_HISTORY_LIMIT);
        let mut objects = Vec::new();
        for i in 0..3 {
            objects.push(rect(i as f32));
            history.record(&objects);
        }
        history.undo();
        history.undo();
        history.record(&[rect(9.0)]);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn snapshots_are_not_aliased_with_live_state() {
        let mut history = CommandHistory::new(&[], DEFAULT_HISTORY_LIMIT);
        let mut objects = vec![rect(0.0)];
        history.record(&objects);
        objects[0].attrs.x = 500.0;
        history.record(&objects);

        let mut restored = history.undo().unwrap();
        assert_eq!(restored[0].attrs.x, 0.0);
        restored[0].attrs.x = -1.0;
        assert_eq!(history.redo().unwrap()[0].attrs.x, 500.0);
        assert_eq!(history.undo().unwrap()[0].attrs.x, 0.0);
    }

    #[test]
    fn oldest_snapshots_are_dropped_past_the_limit() {
        let mut history = CommandHistory::new(&[], 3);
        for i in 0..5 {
            history.record(&[rect(i as f32)]);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.step(), 2);
        history.undo();
        let oldest = history.undo().unwrap();
        assert_eq!(oldest[0].attrs.x, 2.0);
        assert!(!history.can_undo());
    }

    #[test]
    fn amend_folds_into_the_latest_entry() {
        let mut history = CommandHistory::new(&[], DEFAULT_HISTORY_LIMIT);
        history.amend(&[rect(0.0)]);
        assert_eq!(history.len(), 2);

        history.record(&[rect(1.0)]);
        let last = vec![rect(3.0)];
        history.amend(&[rect(2.0)]);
        history.amend(&last);
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo().map(|s| s.len()), Some(1));
        assert_eq!(history.redo(), Some(last));
    }
}
