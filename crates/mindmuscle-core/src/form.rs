/// Which action a form submit performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Idle,
    Editing(usize),
}

impl FormMode {
    pub fn editing_index(&self) -> Option<usize> {
        match self {
            FormMode::Idle => None,
            FormMode::Editing(index) => Some(*index),
        }
    }

    /// Keep the edited position pointing at the same entry after `removed`
    /// was deleted from the collection.
    pub fn after_removal(self, removed: usize) -> FormMode {
        match self {
            FormMode::Editing(index) if index == removed => FormMode::Idle,
            FormMode::Editing(index) if index > removed => FormMode::Editing(index - 1),
            other => other,
        }
    }
}
