//! The ordered schema steps, one file per transition.

mod custom_media_records;
mod page_background_ids;
mod reserved;
mod selected_media_id;
mod split_shuffle_preference;

use std::sync::Arc;

use crate::catalog::entry::BuiltinMedia;
use crate::store::SettingsStore;

use super::step::MigrationStep;

use custom_media_records::CustomMediaRecordsStep;
use page_background_ids::PageBackgroundIdsStep;
use reserved::ReservedStep;
use selected_media_id::SelectedMediaIdStep;
use split_shuffle_preference::SplitShufflePreferenceStep;

/// Builds the full step table in schema order.
pub(crate) fn default_steps(
    store: &Arc<dyn SettingsStore>,
    builtins: &Arc<Vec<BuiltinMedia>>,
) -> Vec<Box<dyn MigrationStep>> {
    vec![
        Box::new(ReservedStep),
        Box::new(SplitShufflePreferenceStep::new(store.clone())),
        Box::new(CustomMediaRecordsStep::new(store.clone(), builtins.clone())),
        Box::new(SelectedMediaIdStep::new(store.clone(), builtins.clone())),
        Box::new(PageBackgroundIdsStep::new(store.clone(), builtins.clone())),
    ]
}
