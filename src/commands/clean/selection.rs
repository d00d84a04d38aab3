//! Non-interactive selection of cleanup candidates.

use crate::cleanup::{CleanableItem, CleanupSet};
use crate::error::{ArborError, Result};

/// Pick the items to remove.
///
/// With selectors, exactly the offered items matching them are returned, in
/// offer order. Without selectors, everything offered is returned. A
/// selector naming a held-back item or nothing at all is an error, reported
/// before anything is removed.
pub fn select_items(set: &CleanupSet, selectors: &[String]) -> Result<Vec<CleanableItem>> {
    if selectors.is_empty() {
        return Ok(set.to_offer.clone());
    }

    for selector in selectors {
        if set.to_offer.iter().any(|item| item.matches(selector)) {
            continue;
        }

        if let Some(item) = set.skipped.iter().find(|item| item.matches(selector)) {
            return Err(ArborError::UserError(format!(
                "'{}' is not offered for cleanup ({}).\n\n\
                 Review it, then remove it explicitly with:\n  arbor remove {} --force",
                selector,
                item.hold_reason().unwrap_or("held back"),
                selector
            )));
        }

        return Err(ArborError::UserError(format!(
            "no cleanup candidate named '{}'",
            selector
        )));
    }

    Ok(set
        .to_offer
        .iter()
        .filter(|item| selectors.iter().any(|s| item.matches(s)))
        .cloned()
        .collect())
}
