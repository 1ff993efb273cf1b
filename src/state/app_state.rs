//! Controller state definitions

use super::{FormDescriptor, Notification, NotificationSlot};

/// What the presentation layer renders
#[derive(Debug, Clone, Copy)]
pub struct FormListView<'a> {
    pub forms: &'a [FormDescriptor],
    pub loading: bool,
    pub notification: Option<&'a Notification>,
}

/// Transient state owned by the controller
#[derive(Debug)]
pub struct ControllerState {
    // Data
    pub forms: Vec<FormDescriptor>,
    pub default_locale: Option<String>,

    // UI state
    pub loading: bool,
    pub notification: NotificationSlot,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            forms: Vec::new(),
            default_locale: None,
            // Nothing is shown until the first listing arrives
            loading: true,
            notification: NotificationSlot::default(),
        }
    }
}

impl ControllerState {
    /// Replace the listing with a fresh, ordered one
    pub fn finish_loading(&mut self, forms: Vec<FormDescriptor>) {
        self.forms = forms;
        self.loading = false;
    }

    /// A failed listing fetch leaves an empty listing behind
    pub fn fail_loading(&mut self) {
        self.forms.clear();
        self.loading = false;
    }

    pub fn view(&self) -> FormListView<'_> {
        FormListView {
            forms: &self.forms,
            loading: self.loading,
            notification: self.notification.current(),
        }
    }
}
