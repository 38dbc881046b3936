use dialoguer::{Confirm, MultiSelect};
use stratus_core::{ResourceArn, ResourceKind};
use stratus_reconciler::{Interaction, ReconcileError};

/// Terminal prompts for `--interactive` runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Interaction for TerminalPrompt {
    fn select_resources(
        &self,
        kind: ResourceKind,
        candidates: &[ResourceArn],
    ) -> Result<Vec<ResourceArn>, ReconcileError> {
        let items: Vec<&str> = candidates.iter().map(ResourceArn::as_str).collect();
        let picked = MultiSelect::new()
            .with_prompt(format!("Select the {} to modify", kind.plural_label()))
            .items(&items)
            .interact()
            .map_err(|e| ReconcileError::Interaction(e.to_string()))?;

        Ok(picked
            .into_iter()
            .filter_map(|i| candidates.get(i).cloned())
            .collect())
    }

    fn confirm_changes(&self, prompt: &str) -> Result<bool, ReconcileError> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| ReconcileError::Interaction(e.to_string()))
    }
}
