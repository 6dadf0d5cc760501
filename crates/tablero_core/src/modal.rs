use crate::table::{RowId, TallerRef};

/// The action a confirmation modal is holding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteRows { ids: Vec<RowId> },
    ReassignTaller {
        id: RowId,
        next: TallerRef,
        prior: TallerRef,
    },
    SaveUser { form: String },
    ToggleActive { form: String, active: bool },
}

/// Single pending-action slot shared by every confirmation modal.
///
/// Opening a second confirmation before the first resolves is unsupported;
/// the attempt is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModalState {
    pending: Option<PendingAction>,
    pub error_detail: Option<String>,
}

impl ModalState {
    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Returns false when another action is already held.
    pub(crate) fn open(&mut self, action: PendingAction) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(action);
        true
    }

    pub(crate) fn take(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
    }
}
