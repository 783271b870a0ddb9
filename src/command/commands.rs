use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{CommandError, CommandResult};
use crate::element::{ObjectPatch, SceneObject};
use crate::id_generator::ObjectId;

/// A requested mutation of the canonical object list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Append an object on top of the stack. A template goes to the bottom instead.
    Insert(SceneObject),

    /// Shallow-merge attributes into one object, in place
    Patch { id: ObjectId, patch: ObjectPatch },

    /// Remove one object
    Remove(ObjectId),

    /// Remove several objects as one edit
    RemoveMany(Vec<ObjectId>),

    /// Replace the whole list (template selection)
    ReplaceAll(Vec<SceneObject>),

    /// Move the object at forward index `from` to forward index `to`
    Reorder { from: usize, to: usize },

    /// Replace the whole list with a loaded design
    Load(Vec<SceneObject>),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert(_) => "insert",
            Command::Patch { .. } => "patch",
            Command::Remove(_) => "remove",
            Command::RemoveMany(_) => "remove many",
            Command::ReplaceAll(_) => "replace all",
            Command::Reorder { .. } => "reorder",
            Command::Load(_) => "load",
        }
    }

    /// Applies the command to `objects`.
    ///
    /// Targets that no longer exist are ignored. Commands that would create a
    /// duplicate id or a second template are refused and leave the list as is.
    pub fn execute(&self, objects: &mut Vec<SceneObject>) -> CommandResult {
        match self {
            Command::Insert(object) => {
                if objects.iter().any(|o| o.id() == object.id()) {
                    return Err(CommandError::DuplicateId(object.id()));
                }
                if object.is_template() && objects.iter().any(SceneObject::is_template) {
                    return Err(CommandError::SecondTemplate);
                }
                if object.is_template() {
                    objects.insert(0, object.clone());
                } else {
                    objects.push(object.clone());
                }
                Ok(true)
            }

            Command::Patch { id, patch } => match objects.iter_mut().find(|o| o.id() == *id) {
                Some(object) => Ok(patch.apply(object)),
                None => {
                    log::debug!("Patch for missing object {id} ignored");
                    Ok(false)
                }
            },

            Command::Remove(id) => {
                let before = objects.len();
                objects.retain(|o| o.id() != *id);
                Ok(objects.len() != before)
            }

            Command::RemoveMany(ids) => {
                let before = objects.len();
                objects.retain(|o| !ids.contains(&o.id()));
                Ok(objects.len() != before)
            }

            Command::ReplaceAll(list) | Command::Load(list) => {
                validate_list(list)?;
                let list = template_first(list);
                if *objects == list {
                    return Ok(false);
                }
                *objects = list;
                Ok(true)
            }

            Command::Reorder { from, to } => {
                let len = objects.len();
                for index in [*from, *to] {
                    if index >= len {
                        return Err(CommandError::OutOfRange { index, len });
                    }
                }
                if from == to {
                    return Ok(false);
                }
                if objects[*from].is_template() || objects[*to].is_template() {
                    return Err(CommandError::TemplatePinned);
                }
                array_move(objects, *from, *to);
                Ok(true)
            }
        }
    }
}

fn validate_list(list: &[SceneObject]) -> Result<(), CommandError> {
    let mut seen = HashSet::new();
    for object in list {
        if !seen.insert(object.id()) {
            return Err(CommandError::DuplicateId(object.id()));
        }
    }
    if list.iter().filter(|o| o.is_template()).count() > 1 {
        return Err(CommandError::SecondTemplate);
    }
    Ok(())
}

/// `list` with its template, if any, moved to the bottom of the stack.
fn template_first(list: &[SceneObject]) -> Vec<SceneObject> {
    let (mut ordered, rest): (Vec<_>, Vec<_>) = list.iter().cloned().partition(SceneObject::is_template);
    ordered.extend(rest);
    ordered
}

/// Removes the item at `from` and reinserts it at `to`.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, Vec2};

    fn rect() -> SceneObject {
        SceneObject::rect(Pos2::ZERO, Vec2::splat(10.0))
    }

    #[test]
    fn array_move_matches_remove_then_insert() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        array_move(&mut v, 0, 3);
        assert_eq!(v, vec!['b', 'c', 'd', 'a']);
        array_move(&mut v, 3, 1);
        assert_eq!(v, vec!['b', 'a', 'c', 'd']);
        array_move(&mut v, 9, 0);
        assert_eq!(v, vec!['b', 'a', 'c', 'd']);
    }

    #[test]
    fn insert_refuses_duplicates_and_second_template() {
        let a = rect();
        let mut objects = vec![a.clone()];
        assert_eq!(
            Command::Insert(a.clone()).execute(&mut objects),
            Err(CommandError::DuplicateId(a.id()))
        );

        let t1 = SceneObject::template("/t1.svg", Vec2::new(800.0, 600.0), None);
        let t2 = SceneObject::template("/t2.svg", Vec2::new(800.0, 600.0), None);
        assert_eq!(Command::Insert(t1).execute(&mut objects), Ok(true));
        assert_eq!(
            Command::Insert(t2).execute(&mut objects),
            Err(CommandError::SecondTemplate)
        );
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn patch_and_remove_of_missing_target_are_no_ops() {
        let mut objects = vec![rect()];
        let ghost = rect().id();
        let patch = Command::Patch {
            id: ghost,
            patch: ObjectPatch::position(1.0, 1.0),
        };
        assert_eq!(patch.execute(&mut objects), Ok(false));
        assert_eq!(Command::Remove(ghost).execute(&mut objects), Ok(false));
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn reorder_keeps_template_pinned() {
        let template = SceneObject::template("/t.svg", Vec2::new(800.0, 600.0), None);
        let (a, b) = (rect(), rect());
        let mut objects = vec![template, a.clone(), b.clone()];
        assert_eq!(
            Command::Reorder { from: 2, to: 0 }.execute(&mut objects),
            Err(CommandError::TemplatePinned)
        );
        assert_eq!(Command::Reorder { from: 2, to: 1 }.execute(&mut objects), Ok(true));
        assert_eq!(objects[1].id(), b.id());
        assert_eq!(objects[2].id(), a.id());
        assert_eq!(Command::Reorder { from: 1, to: 1 }.execute(&mut objects), Ok(false));
        assert!(matches!(
            Command::Reorder { from: 5, to: 1 }.execute(&mut objects),
            Err(CommandError::OutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn replace_all_rejects_duplicate_ids() {
        let a = rect();
        let mut objects = Vec::new();
        assert_eq!(
            Command::ReplaceAll(vec![a.clone(), a.clone()]).execute(&mut objects),
            Err(CommandError::DuplicateId(a.id()))
        );
        assert!(objects.is_empty());
    }

    #[test]
    fn inserted_template_goes_to_the_bottom() {
        let (a, b) = (rect(), rect());
        let mut objects = vec![a.clone(), b.clone()];
        let template = SceneObject::template("/t.svg", Vec2::new(800.0, 600.0), None);
        assert_eq!(Command::Insert(template.clone()).execute(&mut objects), Ok(true));
        let order: Vec<_> = objects.iter().map(SceneObject::id).collect();
        assert_eq!(order, vec![template.id(), a.id(), b.id()]);
    }

    #[test]
    fn loaded_lists_put_the_template_first() {
        let (a, b) = (rect(), rect());
        let template = SceneObject::template("/t.svg", Vec2::new(800.0, 600.0), None);
        let mut objects = Vec::new();
        let load = Command::Load(vec![a.clone(), template.clone(), b.clone()]);
        assert_eq!(load.execute(&mut objects), Ok(true));
        let order: Vec<_> = objects.iter().map(SceneObject::id).collect();
        assert_eq!(order, vec![template.id(), a.id(), b.id()]);
        // Same content in a different order is not a change once pinned.
        assert_eq!(load.execute(&mut objects), Ok(false));
    }
}
