//! Editor for tables holding zero or one row

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::crud::capitalize;
use crate::error::{Error, Operation, SyncError};
use crate::models::Entity;
use crate::notify::{Notice, Notifier};
use crate::store::{Query, TableStore};

struct State<E: Entity> {
    record: Option<E::Record>,
    draft: E::Draft,
    /// Whether `record` reflects the table. False before the first load and
    /// after an insert whose refresh has not landed.
    resolved: bool,
}

/// Loads the single row of a table into a draft and writes it back.
///
/// A submit updates the known row by its key and inserts only when the
/// table is known to be empty. If that is not known, the row is looked up
/// again before writing.
pub struct SingletonEditor<E: Entity, S: TableStore + ?Sized> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<State<E>>,
    latest_load: AtomicU64,
}

impl<E: Entity, S: TableStore + ?Sized> SingletonEditor<E, S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            state: Mutex::new(State {
                record: None,
                draft: E::Draft::default(),
                resolved: false,
            }),
            latest_load: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, op: Operation, source: Error) -> SyncError {
        self.notifier
            .notify(Notice::error(format!("Failed to {} {}", op, E::LABEL)));
        SyncError::remote(op, source)
    }

    async fn fetch(&self) -> Result<Option<E::Record>, Error> {
        let row = self.store.select_one(E::TABLE, &Query::new()).await?;
        Ok(row.map(serde_json::from_value::<E::Record>).transpose()?)
    }

    /// Read the row into the draft. A load overtaken by a newer one is
    /// dropped, failures included.
    pub async fn load(&self) -> Result<(), SyncError> {
        let token = self.latest_load.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.fetch().await;

        if self.latest_load.load(Ordering::SeqCst) != token {
            debug!(table = E::TABLE, token, "Discarding stale load");
            return Ok(());
        }
        let record = fetched.map_err(|err| self.fail(Operation::Load, err))?;

        let mut state = self.state();
        state.draft = match &record {
            Some(record) => E::to_draft(record),
            None => E::Draft::default(),
        };
        state.record = record;
        state.resolved = true;
        Ok(())
    }

    /// Key of the row to update, looking it up when the last write left it
    /// unknown. The draft is not touched.
    async fn resolve(&self) -> Result<Option<String>, SyncError> {
        {
            let state = self.state();
            if state.resolved {
                return Ok(state.record.as_ref().map(|r| E::id(r).to_string()));
            }
        }
        let record = self
            .fetch()
            .await
            .map_err(|err| self.fail(Operation::Load, err))?;
        let id = record.as_ref().map(|r| E::id(r).to_string());

        let mut state = self.state();
        state.record = record;
        state.resolved = true;
        Ok(id)
    }

    pub async fn submit(&self) -> Result<(), SyncError> {
        let draft = self.state().draft.clone();
        let payload = match E::to_payload(&draft) {
            Ok(payload) => payload,
            Err(err) => {
                self.notifier
                    .notify(Notice::error(format!("Invalid input: {}", err)));
                return Err(err.into());
            }
        };
        let existing = self.resolve().await?;

        let op = match existing {
            Some(_) => Operation::Update,
            None => Operation::Create,
        };
        let row = serde_json::to_value(&payload).map_err(|err| self.fail(op, err.into()))?;
        let result = match &existing {
            Some(id) => self.store.update(E::TABLE, id, row).await,
            None => self.store.insert(E::TABLE, row).await,
        };
        result.map_err(|err| self.fail(op, err))?;
        if existing.is_none() {
            self.state().resolved = false;
        }

        info!(table = E::TABLE, id = ?existing, "{} {}d", E::LABEL, op);
        self.notifier.notify(Notice::success(format!(
            "{} {}d successfully",
            capitalize(E::LABEL),
            op
        )));
        self.reload().await;
        Ok(())
    }

    /// The write already landed; a failed refresh has been notified by `load`
    async fn reload(&self) {
        if let Err(err) = self.load().await {
            debug!(table = E::TABLE, error = %err, "Reload after write failed");
        }
    }

    pub fn record(&self) -> Option<E::Record> {
        self.state().record.clone()
    }

    /// Key of the row found by the last load
    pub fn existing_id(&self) -> Option<String> {
        self.state().record.as_ref().map(|r| E::id(r).to_string())
    }

    pub fn draft(&self) -> E::Draft {
        self.state().draft.clone()
    }

    pub fn set_draft(&self, draft: E::Draft) {
        self.state().draft = draft;
    }

    pub fn edit_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut E::Draft),
    {
        edit(&mut self.state().draft);
    }
}
