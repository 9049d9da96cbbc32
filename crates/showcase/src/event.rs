use foundation::ids::WaypointId;
use serde::Serialize;
use viewport::ScaleChange;

/// Everything observable that happened during a frame, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShowcaseEvent {
    ScaleChanged(ScaleChange),
    #[serde(rename_all = "camelCase")]
    MarkerChanged {
        id: WaypointId,
        previous: Option<WaypointId>,
        name: String,
    },
    AnimationCompleted { id: WaypointId },
    IntroFinished,
    MapReady,
    MapFailed { message: String },
    ReloadRequested,
    WelcomeExpanded,
    WelcomeCollapsed,
    StyleChanged { index: usize, url: String },
}
