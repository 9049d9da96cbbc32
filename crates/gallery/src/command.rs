use foundation::bounds::Rect;
use serde::Serialize;

use crate::request::LoadTicket;
use crate::slot::SlotId;

/// Side effects the host performs on behalf of the gallery, drained per frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GalleryCommand {
    /// Point `slot` at `url` and report back with `ticket`.
    LoadImage {
        ticket: LoadTicket,
        position: usize,
        slot: SlotId,
        url: String,
    },
    /// Fetch in the background; nothing is displayed.
    PreloadImage { ticket: LoadTicket, url: String },
    StartCrossfade {
        position: usize,
        to: SlotId,
        duration_ms: f64,
    },
    /// `slot` is now the visible one, with no transition.
    ActivateSlot { position: usize, slot: SlotId },
    LoadFullImage {
        ticket: LoadTicket,
        position: usize,
        url: String,
    },
    /// Place the full image beneath the thumbnail of `position`.
    ShowFullImage { position: usize, url: String },
    ExpandStarted {
        position: usize,
        from: Rect,
        to: Rect,
        duration_ms: f64,
    },
    CollapseStarted {
        position: usize,
        to: Rect,
        duration_ms: f64,
    },
    ExpansionFinished { position: usize, expanded: bool },
}
