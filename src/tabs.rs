// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Result tab strip

use std::collections::HashSet;
use tracing::debug;

use crate::config::TabBinding;
use crate::{NotescopeError, Result};

/// Exactly one tab control and its pane are active at a time
#[derive(Debug, Clone)]
pub struct TabController {
    bindings: Vec<TabBinding>,
    active: Vec<bool>,
}

impl TabController {
    /// Validate the tab table; the first tab starts active
    pub fn new(bindings: Vec<TabBinding>) -> Result<Self> {
        if bindings.is_empty() {
            return Err(NotescopeError::Config("tab table is empty".to_string()));
        }

        {
            let mut tabs = HashSet::new();
            let mut panes = HashSet::new();
            for binding in &bindings {
                if binding.tab.is_empty() || binding.pane.is_empty() {
                    return Err(NotescopeError::Config(format!(
                        "tab binding {:?} -> {:?} has an empty id",
                        binding.tab, binding.pane
                    )));
                }
                if !tabs.insert(binding.tab.as_str()) {
                    return Err(NotescopeError::Config(format!("duplicate tab id {:?}", binding.tab)));
                }
                if !panes.insert(binding.pane.as_str()) {
                    return Err(NotescopeError::Config(format!("pane {:?} is bound twice", binding.pane)));
                }
            }
        }

        let mut active = vec![false; bindings.len()];
        active[0] = true;
        Ok(Self { bindings, active })
    }

    /// Activate `tab_id` and deactivate every other tab
    pub fn select(&mut self, tab_id: &str) -> Result<()> {
        let index = self
            .bindings
            .iter()
            .position(|b| b.tab == tab_id)
            .ok_or_else(|| NotescopeError::UnknownTab(tab_id.to_string()))?;

        self.active.iter_mut().for_each(|a| *a = false);
        self.active[index] = true;
        debug!("Tab {} active (pane {})", tab_id, self.bindings[index].pane);
        Ok(())
    }

    pub fn active(&self) -> &TabBinding {
        let index = self.active.iter().position(|a| *a).unwrap_or(0);
        &self.bindings[index]
    }

    pub fn is_active(&self, tab_id: &str) -> bool {
        self.bindings
            .iter()
            .zip(&self.active)
            .any(|(b, a)| *a && b.tab == tab_id)
    }

    /// Every binding with its active flag, in strip order
    pub fn entries(&self) -> impl Iterator<Item = (&TabBinding, bool)> {
        self.bindings.iter().zip(self.active.iter().copied())
    }
}
