//! Bulk actions over selected rows.

use std::fmt;
use std::sync::Arc;

use crate::model::Row;

/// Visual weight of a bulk-action button. Only carried through for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionVariant {
    #[default]
    Default,
    Destructive,
    Outline,
    Secondary,
    Ghost,
    Link,
}

/// A host-defined operation on the selected rows (delete, mark active, …).
///
/// The table only resolves the selection and clears it once the action has
/// run; what the action does with the rows is up to the host.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use tableview_lib::view::{ActionVariant, BulkAction};
///
/// let deleted = Arc::new(Mutex::new(Vec::new()));
/// let sink = deleted.clone();
/// let delete = BulkAction::new("Delete", move |rows| {
///     sink.lock().unwrap().extend(rows.iter().cloned());
/// })
/// .with_variant(ActionVariant::Destructive);
///
/// assert_eq!(delete.label(), "Delete");
/// ```
#[derive(Clone)]
pub struct BulkAction {
    label: String,
    variant: ActionVariant,
    action: Arc<dyn Fn(&[Row]) + Send + Sync>,
}

impl BulkAction {
    /// Creates a bulk action.
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn(&[Row]) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            variant: ActionVariant::Default,
            action: Arc::new(action),
        }
    }

    /// Sets the button variant.
    pub fn with_variant(mut self, variant: ActionVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Button label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Button variant.
    pub fn variant(&self) -> ActionVariant {
        self.variant
    }

    /// Runs the action on `rows`.
    pub fn run(&self, rows: &[Row]) {
        (self.action)(rows)
    }
}

impl fmt::Debug for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("label", &self.label)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
