// src/state.rs

use crate::core::catalogue::{self, CatalogueError};
use crate::models::Catalogue;

/// The catalogue as loaded, plus a snapshot taken before the first mutation.
#[derive(Debug)]
enum CatalogueState {
    /// No mutable access has been requested yet.
    Pristine(Catalogue),
    /// Mutable access was handed out at least once.
    Dirty {
        original: Catalogue,
        current: Catalogue,
    },
}

/// The application state handed to every command handler.
///
/// Handlers mutate the catalogue through [`AppState::catalogue_mut`]; the binary
/// saves it afterwards only if it really changed.
#[derive(Debug)]
pub struct AppState {
    state: CatalogueState,
}

impl AppState {
    /// Wraps an already loaded catalogue.
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            state: CatalogueState::Pristine(catalogue),
        }
    }

    /// Loads the catalogue from the pier config directory.
    pub fn load() -> Result<Self, CatalogueError> {
        Ok(Self::new(catalogue::load_catalogue()?))
    }

    /// Read access.
    pub fn catalogue(&self) -> &Catalogue {
        match &self.state {
            CatalogueState::Pristine(catalogue) => catalogue,
            CatalogueState::Dirty { current, .. } => current,
        }
    }

    /// Mutable access. The first call snapshots the catalogue.
    pub fn catalogue_mut(&mut self) -> &mut Catalogue {
        let state = std::mem::replace(
            &mut self.state,
            CatalogueState::Pristine(Catalogue::default()),
        );
        self.state = match state {
            CatalogueState::Pristine(catalogue) => CatalogueState::Dirty {
                original: catalogue.clone(),
                current: catalogue,
            },
            dirty => dirty,
        };

        match &mut self.state {
            CatalogueState::Dirty { current, .. } => current,
            CatalogueState::Pristine(catalogue) => catalogue,
        }
    }

    /// Whether the current catalogue differs from the one that was loaded.
    pub fn needs_saving(&self) -> bool {
        match &self.state {
            CatalogueState::Pristine(_) => false,
            CatalogueState::Dirty { original, current } => original != current,
        }
    }

    /// Saves the catalogue if it changed. Returns whether anything was written.
    pub fn save_if_needed(&self) -> Result<bool, CatalogueError> {
        if !self.needs_saving() {
            log::debug!("Catalogue unchanged. Nothing to save.");
            return Ok(false);
        }
        catalogue::save_catalogue(self.catalogue())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use std::path::PathBuf;

    fn sample() -> Catalogue {
        Catalogue {
            projects: vec![Project::new(PathBuf::from("/work/api"), None)],
        }
    }

    #[test]
    fn test_pristine_state_never_needs_saving() {
        let state = AppState::new(sample());
        assert!(!state.needs_saving());
        assert_eq!(state.catalogue(), &sample());
    }

    #[test]
    fn test_mutation_marks_state_dirty() {
        let mut state = AppState::new(sample());
        state
            .catalogue_mut()
            .projects
            .push(Project::new(PathBuf::from("/work/web"), None));

        assert!(state.needs_saving());
        assert_eq!(state.catalogue().projects.len(), 2);
    }

    #[test]
    fn test_reverted_mutation_does_not_need_saving() {
        let mut state = AppState::new(sample());
        state.catalogue_mut().projects.clear();
        state
            .catalogue_mut()
            .projects
            .push(Project::new(PathBuf::from("/work/api"), None));

        assert!(!state.needs_saving());
    }
}
