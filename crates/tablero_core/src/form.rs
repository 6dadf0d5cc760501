use crate::table::TallerRef;

/// Sentinel option value for a workshop named inline but not yet created.
pub const NEW_TALLER_VALUE: &str = "new";

/// Workshop choice carried by a job submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallerChoice {
    Existing { id: String },
    New { nombre: String },
}

/// State of the job-creation form, including the inline new-workshop modal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateForm {
    pub patente: String,
    pub cursor: usize,
    /// Selected option value: empty, an existing id, or [`NEW_TALLER_VALUE`].
    pub taller_value: String,
    pub taller_options: Vec<TallerRef>,
    pub new_taller_nombre: String,
    pub naming_taller: bool,
    pub naming_error: bool,
    pub naming_draft: String,
}

impl CreateForm {
    /// Submission requires a plate plus either an existing workshop or an
    /// inline-named new one.
    pub fn submit_enabled(&self) -> bool {
        let has_patente = !self.patente.trim().is_empty();
        let has_taller = if self.taller_value == NEW_TALLER_VALUE {
            !self.new_taller_nombre.trim().is_empty()
        } else {
            !self.taller_value.is_empty()
        };
        has_patente && has_taller
    }

    /// Label shown in the optimistic row for the chosen workshop.
    pub fn taller_label(&self) -> String {
        if self.taller_value == NEW_TALLER_VALUE {
            let nombre = self.new_taller_nombre.trim();
            if nombre.is_empty() {
                return "-".to_string();
            }
            return nombre.to_string();
        }
        self.taller_options
            .iter()
            .find(|option| option.id == self.taller_value)
            .map(|option| option.nombre.clone())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn choice(&self) -> Option<TallerChoice> {
        if self.taller_value == NEW_TALLER_VALUE {
            let nombre = self.new_taller_nombre.trim();
            if nombre.is_empty() {
                return None;
            }
            return Some(TallerChoice::New {
                nombre: nombre.to_string(),
            });
        }
        if self.taller_value.is_empty() {
            return None;
        }
        Some(TallerChoice::Existing {
            id: self.taller_value.clone(),
        })
    }

    /// Picking an existing workshop discards any inline-named one.
    pub(crate) fn select_taller(&mut self, value: String) {
        if value != NEW_TALLER_VALUE {
            self.new_taller_nombre.clear();
        }
        self.taller_value = value;
    }

    /// Confirm the new-workshop modal; an empty name keeps it open with the
    /// validation error set.
    pub(crate) fn confirm_new_taller(&mut self) {
        let nombre = self.naming_draft.trim().to_string();
        if nombre.is_empty() {
            self.naming_error = true;
            return;
        }
        self.taller_value = NEW_TALLER_VALUE.to_string();
        self.new_taller_nombre = nombre;
        self.naming_taller = false;
        self.naming_error = false;
    }

    /// Adopt a server-assigned workshop after creation: the real id replaces
    /// the inline sentinel and joins the option list.
    pub(crate) fn adopt_assigned(&mut self, taller: TallerRef) {
        if !self
            .taller_options
            .iter()
            .any(|option| option.id == taller.id)
        {
            self.taller_options.push(taller.clone());
        }
        self.taller_value = taller.id;
        self.new_taller_nombre.clear();
    }
}
