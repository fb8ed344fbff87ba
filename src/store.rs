//! In-memory task store.
//!
//! A single ordered sequence of tasks behind one lock. Identifiers are
//! unique: the store mints them from a monotonic counter when the client
//! does not supply one, and rejects creates that would collide. Insertion
//! order is the only order; no operation reorders surviving tasks.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

// ── Records ──────────────────────────────────────────────────────────────────

/// The single domain record: a todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
}

/// Request-body shape for create and replace.
///
/// `id` is optional: the server assigns one when it is absent. `completed`
/// defaults to false so a bare `{"text": "..."}` body is a valid create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no task with id {0}")]
    NotFound(i64),
    #[error("a task with id {0} already exists")]
    DuplicateId(i64),
}

// ── Store ────────────────────────────────────────────────────────────────────

struct StoreInner {
    tasks: Vec<Task>,
    /// Next id to mint. Always greater than every id ever stored, so a
    /// client-supplied id can never collide with a later minted one.
    next_id: i64,
}

/// Thread-safe in-memory task store.
///
/// One lock covers both the sequence and the id counter, so uniqueness
/// checks, minting, and the insert itself are a single atomic step.
pub struct TaskStore {
    inner: RwLock<StoreInner>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Snapshot of the full sequence in insertion order.
    pub async fn list(&self) -> Vec<Task> {
        self.inner.read().await.tasks.clone()
    }

    /// Current task count.
    pub async fn len(&self) -> usize {
        self.inner.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.tasks.is_empty()
    }

    /// Append a task. A supplied id must be free; a missing id is minted.
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let id = match draft.id {
            Some(id) => {
                if inner.tasks.iter().any(|t| t.id == id) {
                    return Err(StoreError::DuplicateId(id));
                }
                inner.next_id = inner.next_id.max(id.saturating_add(1));
                id
            }
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                id
            }
        };
        let task = Task {
            id,
            text: draft.text,
            completed: draft.completed,
        };
        inner.tasks.push(task.clone());
        debug!(id = task.id, "task created");
        Ok(task)
    }

    /// Wholesale replacement of the task with the given id.
    ///
    /// The stored id is the given one — replacement cannot change a
    /// record's identity. Position in the sequence is preserved.
    pub async fn replace(&self, id: i64, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = Task {
            id,
            text: draft.text,
            completed: draft.completed,
        };
        Ok(slot.clone())
    }

    /// Remove and return the task with the given id.
    pub async fn remove(&self, id: i64) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(inner.tasks.remove(index))
    }

    /// Seed the two welcome tasks shown on first run. No-op unless the
    /// store is empty.
    pub async fn seed_welcome(&self) {
        let mut inner = self.inner.write().await;
        if !inner.tasks.is_empty() {
            return;
        }
        for text in [
            "Welcome! Mark a task done with `todod toggle <id>`",
            "Remove a task with `todod rm <id>`",
        ] {
            let id = inner.next_id;
            inner.next_id += 1;
            inner.tasks.push(Task {
                id,
                text: text.to_string(),
                completed: false,
            });
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str) -> TaskDraft {
        TaskDraft {
            id: None,
            text: text.to_string(),
            completed: false,
        }
    }

    fn draft_with_id(id: i64, text: &str) -> TaskDraft {
        TaskDraft {
            id: Some(id),
            text: text.to_string(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn create_mints_sequential_ids_in_insertion_order() {
        let store = TaskStore::new();
        for text in ["a", "b", "c"] {
            store.create(draft(text)).await.unwrap();
        }
        let tasks = store.list().await;
        assert_eq!(
            tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(
            tasks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[tokio::test]
    async fn client_supplied_id_advances_the_counter() {
        let store = TaskStore::new();
        store.create(draft_with_id(10, "a")).await.unwrap();
        let next = store.create(draft("b")).await.unwrap();
        assert_eq!(next.id, 11);
    }

    #[tokio::test]
    async fn client_supplied_id_below_counter_does_not_regress_it() {
        let store = TaskStore::new();
        store.create(draft("a")).await.unwrap();
        store.create(draft("b")).await.unwrap();
        store.remove(1).await.unwrap();
        // Id 1 is free again; reusing it must not rewind minting.
        store.create(draft_with_id(1, "c")).await.unwrap();
        let next = store.create(draft("d")).await.unwrap();
        assert_eq!(next.id, 3);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected_and_collection_unchanged() {
        let store = TaskStore::new();
        store.create(draft_with_id(7, "a")).await.unwrap();
        let err = store.create(draft_with_id(7, "b")).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateId(7));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn replace_changes_only_the_target_and_keeps_position() {
        let store = TaskStore::new();
        for text in ["a", "b", "c"] {
            store.create(draft(text)).await.unwrap();
        }
        let before = store.list().await;
        let updated = store
            .replace(
                2,
                TaskDraft {
                    id: Some(2),
                    text: "b".to_string(),
                    completed: true,
                },
            )
            .await
            .unwrap();
        assert!(updated.completed);
        let after = store.list().await;
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1].id, 2);
        assert!(after[1].completed);
    }

    #[tokio::test]
    async fn replace_missing_id_is_not_found() {
        let store = TaskStore::new();
        let err = store.replace(99, draft("x")).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(99));
    }

    #[tokio::test]
    async fn remove_missing_id_leaves_length_unchanged() {
        let store = TaskStore::new();
        store.create(draft("a")).await.unwrap();
        let err = store.remove(99).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(99));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn create_replace_remove_round_trip_restores_initial_state() {
        let store = TaskStore::new();
        store.create(draft("keep")).await.unwrap();
        let before = store.list().await;

        store.create(draft_with_id(50, "buy milk")).await.unwrap();
        store
            .replace(
                50,
                TaskDraft {
                    id: Some(50),
                    text: "buy milk".to_string(),
                    completed: true,
                },
            )
            .await
            .unwrap();
        store.remove(50).await.unwrap();

        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn seed_welcome_is_idempotent_and_skips_nonempty_stores() {
        let store = TaskStore::new();
        store.seed_welcome().await;
        assert_eq!(store.len().await, 2);
        store.seed_welcome().await;
        assert_eq!(store.len().await, 2);

        let populated = TaskStore::new();
        populated.create(draft("existing")).await.unwrap();
        populated.seed_welcome().await;
        assert_eq!(populated.len().await, 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// A create (text index) or a remove targeting the nth live task.
        #[derive(Debug, Clone)]
        enum Op {
            Create,
            Remove(usize),
        }

        fn ops() -> impl Strategy<Value = Vec<Op>> {
            prop::collection::vec(
                prop_oneof![
                    3 => Just(Op::Create),
                    1 => (0usize..8).prop_map(Op::Remove),
                ],
                1..40,
            )
        }

        proptest! {
            /// Random create/remove interleavings never produce a
            /// duplicate id, and survivors keep their relative order.
            #[test]
            fn ids_stay_unique_and_order_is_stable(ops in ops()) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let store = TaskStore::new();
                    let mut model: Vec<i64> = Vec::new();
                    for op in ops {
                        match op {
                            Op::Create => {
                                let task = store
                                    .create(TaskDraft {
                                        id: None,
                                        text: "t".to_string(),
                                        completed: false,
                                    })
                                    .await
                                    .unwrap();
                                model.push(task.id);
                            }
                            Op::Remove(nth) => {
                                if !model.is_empty() {
                                    let id = model[nth % model.len()];
                                    store.remove(id).await.unwrap();
                                    model.retain(|&m| m != id);
                                }
                            }
                        }
                    }
                    let ids: Vec<i64> =
                        store.list().await.iter().map(|t| t.id).collect();
                    prop_assert_eq!(&ids, &model);
                    let mut deduped = ids.clone();
                    deduped.dedup();
                    prop_assert_eq!(deduped.len(), ids.len());
                    Ok(())
                })?;
            }
        }
    }
}
