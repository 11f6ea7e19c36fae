//! Keeps a form draft, the remote table and the visible list in step.
//!
//! One [`CrudController`] serves every admin list screen. It owns the loaded
//! records, the draft being edited and the "currently editing" marker. Every
//! successful write is followed by a full reload, so the list never drifts
//! from what the store last returned.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Operation, SyncError, ValidationError};
use crate::models::Entity;
use crate::notify::{Confirm, Notice, Notifier};
use crate::store::{Query, TableStore};

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    /// The user said no; nothing was sent
    Declined,
}

struct State<E: Entity> {
    records: Vec<E::Record>,
    draft: E::Draft,
    editing: Option<String>,
}

/// Decrements the in-flight count when an operation finishes, however it ends
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct CrudController<E: Entity, S: TableStore + ?Sized> {
    store: Arc<S>,
    notifier: Arc<dyn Notifier>,
    query: Query,
    template: E::Draft,
    state: Mutex<State<E>>,
    latest_load: AtomicU64,
    in_flight: AtomicUsize,
}

impl<E: Entity, S: TableStore + ?Sized> CrudController<E, S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            query: E::list_query(),
            template: E::Draft::default(),
            state: Mutex::new(State {
                records: Vec::new(),
                draft: E::Draft::default(),
                editing: None,
            }),
            latest_load: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Load a subset of the table instead of the default list
    pub fn scoped(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Use `template` as the empty draft, for forms with preset fields
    pub fn with_template(mut self, template: E::Draft) -> Self {
        self.state().draft = template.clone();
        self.template = template;
        self
    }

    fn state(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, op: Operation, source: Error) -> SyncError {
        self.notifier
            .notify(Notice::error(format!("Failed to {} {}", op, E::LABEL)));
        SyncError::remote(op, source)
    }

    fn reject(&self, err: ValidationError) -> SyncError {
        self.notifier
            .notify(Notice::error(format!("Invalid input: {}", err)));
        SyncError::Invalid(err)
    }

    /// Fetch the list and replace the visible records wholesale.
    ///
    /// On failure the previous records stay. A fetch that completes after a
    /// newer one was started is dropped silently, even when it failed.
    pub async fn load(&self) -> Result<(), SyncError> {
        let token = self.latest_load.fetch_add(1, Ordering::SeqCst) + 1;
        let _busy = InFlight::start(&self.in_flight);

        let fetched = self.fetch().await;
        if self.latest_load.load(Ordering::SeqCst) != token {
            debug!(table = E::TABLE, token, "Discarding stale load");
            return Ok(());
        }
        self.state().records = fetched.map_err(|err| self.fail(Operation::Load, err))?;
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<E::Record>, Error> {
        let rows = self.store.select(E::TABLE, &self.query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Error::from))
            .collect()
    }

    /// Submit the held draft as a create, or as an update of the record
    /// being edited.
    pub async fn submit(&self) -> Result<(), SyncError> {
        let (draft, editing) = {
            let state = self.state();
            (state.draft.clone(), state.editing.clone())
        };
        self.submit_draft(&draft, editing.as_deref()).await
    }

    /// Write `draft` as an update of `existing_id`, or insert it when no key
    /// is given.
    ///
    /// Invalid drafts never reach the store. On any failure the held draft
    /// is left as it was.
    pub async fn submit_draft(
        &self,
        draft: &E::Draft,
        existing_id: Option<&str>,
    ) -> Result<(), SyncError> {
        match existing_id {
            Some(_) if !E::ALLOWS_EDIT => return Err(self.reject(ValidationError::ReadOnly(E::LABEL))),
            None if !E::ALLOWS_CREATE => {
                return Err(self.reject(ValidationError::NothingSelected(E::LABEL)))
            }
            _ => {}
        }
        let payload = E::to_payload(draft).map_err(|err| self.reject(err))?;

        let op = match existing_id {
            Some(_) => Operation::Update,
            None => Operation::Create,
        };
        let row = serde_json::to_value(&payload).map_err(|err| self.fail(op, err.into()))?;

        let result = {
            let _busy = InFlight::start(&self.in_flight);
            match existing_id {
                Some(id) => self.store.update(E::TABLE, id, row).await,
                None => self.store.insert(E::TABLE, row).await,
            }
        };
        if let Err(err) = result {
            return Err(self.fail(op, err));
        }

        info!(table = E::TABLE, id = ?existing_id, "{} {}d", E::LABEL, op);
        self.notifier.notify(Notice::success(format!(
            "{} {}d successfully",
            capitalize(E::LABEL),
            op
        )));
        self.reset_draft();
        self.reload().await;
        Ok(())
    }

    /// Write a few fields onto one record, e.g. a visibility toggle
    pub async fn patch(&self, id: &str, fields: Value) -> Result<(), SyncError> {
        let result = {
            let _busy = InFlight::start(&self.in_flight);
            self.store.update(E::TABLE, id, fields).await
        };
        if let Err(err) = result {
            return Err(self.fail(Operation::Update, err));
        }
        self.notifier.notify(Notice::success(format!(
            "{} updated successfully",
            capitalize(E::LABEL)
        )));
        self.reload().await;
        Ok(())
    }

    /// Delete one record after the user confirms
    pub async fn remove<C>(&self, id: &str, confirm: &C) -> Result<Removal, SyncError>
    where
        C: Confirm + ?Sized,
    {
        if !E::ALLOWS_DELETE {
            return Err(self.reject(ValidationError::ReadOnly(E::LABEL)));
        }
        let prompt = format!("Are you sure you want to delete this {}?", E::LABEL);
        if !confirm.confirm(&prompt) {
            debug!(table = E::TABLE, id, "Delete declined");
            return Ok(Removal::Declined);
        }

        let result = {
            let _busy = InFlight::start(&self.in_flight);
            self.store.delete(E::TABLE, id).await
        };
        if let Err(err) = result {
            return Err(self.fail(Operation::Delete, err));
        }

        info!(table = E::TABLE, id, "{} deleted", E::LABEL);
        self.notifier.notify(Notice::success(format!(
            "{} deleted successfully",
            capitalize(E::LABEL)
        )));
        self.reload().await;
        Ok(Removal::Deleted)
    }

    /// The write already landed; a failed refresh has been notified by `load`
    async fn reload(&self) {
        if let Err(err) = self.load().await {
            debug!(table = E::TABLE, error = %err, "Reload after write failed");
        }
    }

    /// Copy a record into the draft and mark it as being edited
    pub fn begin_edit(&self, record: &E::Record) {
        let mut state = self.state();
        state.draft = E::to_draft(record);
        state.editing = Some(E::id(record).to_string());
    }

    /// Start editing the loaded record with this key; false if it is not loaded
    pub fn begin_edit_by_id(&self, id: &str) -> bool {
        match self.find(id) {
            Some(record) => {
                self.begin_edit(&record);
                true
            }
            None => false,
        }
    }

    pub fn reset_draft(&self) {
        let mut state = self.state();
        state.draft = self.template.clone();
        state.editing = None;
    }

    pub fn records(&self) -> Vec<E::Record> {
        self.state().records.clone()
    }

    pub fn find(&self, id: &str) -> Option<E::Record> {
        self.state()
            .records
            .iter()
            .find(|record| E::id(record) == id)
            .cloned()
    }

    pub fn draft(&self) -> E::Draft {
        self.state().draft.clone()
    }

    pub fn set_draft(&self, draft: E::Draft) {
        self.state().draft = draft;
    }

    /// Change the draft in place, as a form field binding would
    pub fn edit_draft<F>(&self, edit: F)
    where
        F: FnOnce(&mut E::Draft),
    {
        edit(&mut self.state().draft);
    }

    /// Key of the record being edited, if any
    pub fn editing(&self) -> Option<String> {
        self.state().editing.clone()
    }

    /// Whether any load or write is still in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
