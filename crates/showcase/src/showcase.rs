use card::{CardCommand, Direction, TextQueue, WelcomeCard, WelcomeEvent, WelcomeView};
use foundation::bounds::Rect;
use foundation::ids::WaypointId;
use foundation::math::{Projector, Vec2};
use foundation::time::Time;
use gallery::{ExpansionSpeed, Gallery, GalleryCommand, LayoutProbe, LoadOutcome, LoadTicket};
use prefs::{PreferenceStore, Preferences};
use route::{PathAnimator, Route};
use runtime::event_bus::EventBus;
use runtime::frame::FrameClock;
use serde::Serialize;
use viewport::{DeviceInfo, Resolution, ScaleManager, StyleSink, ViewportContext};

use crate::config::{ConfigError, MapStyle, ShowcaseConfig};
use crate::event::ShowcaseEvent;
use crate::map::{MapEvent, MapLifecycle, MapStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerView {
    pub id: WaypointId,
    pub name: String,
    pub point: Vec2,
    pub active: bool,
    /// Reveal delay of this marker in the intro.
    pub intro_delay_ms: f64,
}

/// Everything the host renders for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub frame: u64,
    pub now: Time,
    pub viewport: ViewportContext,
    pub map: MapStatus,
    pub navigation_enabled: bool,
    pub indicator: Option<Vec2>,
    pub position: f64,
    pub current_marker: WaypointId,
    /// Set when markers and paths were reprojected this frame.
    pub geometry_changed: bool,
    pub markers: Vec<MarkerView>,
    /// SVG path data, one entry per segment.
    pub route_paths: Vec<String>,
    pub card_text: String,
    pub card_commands: Vec<CardCommand>,
    pub gallery_commands: Vec<GalleryCommand>,
    pub image_overlay: Option<Rect>,
    pub welcome: WelcomeView,
    pub events: Vec<ShowcaseEvent>,
}

/// Host-facing inputs available when the page starts.
pub struct Startup<'a> {
    pub device: DeviceInfo,
    pub resolution: Resolution,
    /// Becomes the cache-buster when refresh is forced.
    pub session_token: &'a str,
    pub now: Time,
}

pub struct Showcase {
    config: ShowcaseConfig,
    route: Route,
    clock: FrameClock,
    events: EventBus<ShowcaseEvent>,
    scale: ScaleManager,
    animator: PathAnimator,
    reported_marker: Option<WaypointId>,
    gallery: Gallery,
    card: TextQueue,
    welcome: WelcomeCard,
    map: MapLifecycle,
    prefs: Preferences,
    intro_ends: Option<Time>,
    intro_done: bool,
    geometry_dirty: bool,
    markers: Vec<MarkerView>,
    route_paths: Vec<String>,
}

impl Showcase {
    pub fn new(
        config: ShowcaseConfig,
        startup: Startup<'_>,
        store: &dyn PreferenceStore,
        sink: &mut dyn StyleSink,
    ) -> Result<Self, ConfigError> {
        let route = config.validate()?;
        let first = route
            .waypoints()
            .first()
            .ok_or_else(|| ConfigError::Invalid("itinerary is empty".to_string()))?
            .clone();

        let prefs = match Preferences::load(store) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(error = %err, "preferences unavailable, using defaults");
                Preferences::default()
            }
        };

        let mut scale = ScaleManager::new(config.scale.clone());
        let initial_scale = scale.initialize(startup.device, startup.resolution, sink);

        let mut animator = PathAnimator::new(config.animator.clone());
        animator.reset_to(first.id);

        // The initial MarkerChanged below loads the first waypoint's images.
        let gallery = Gallery::new(
            config.gallery.clone(),
            config.image_sources(startup.session_token),
        );

        let map = MapLifecycle::start(&config.map, startup.now);
        let mut events = EventBus::new();
        events.emit(0, ShowcaseEvent::ScaleChanged(initial_scale));
        events.emit(
            0,
            ShowcaseEvent::MarkerChanged {
                id: first.id,
                previous: None,
                name: first.name.clone(),
            },
        );
        if let MapStatus::Failed(err) = map.status() {
            events.emit(
                0,
                ShowcaseEvent::MapFailed {
                    message: err.to_string(),
                },
            );
        }

        tracing::info!(
            waypoints = route.len(),
            scale = initial_scale.context.scale,
            "showcase started"
        );

        Ok(Self {
            card: TextQueue::new(config.text_queue, first.name),
            welcome: WelcomeCard::new(config.welcome),
            config,
            route,
            clock: FrameClock::new(),
            events,
            scale,
            animator,
            reported_marker: Some(first.id),
            gallery,
            map,
            prefs,
            intro_ends: None,
            intro_done: false,
            geometry_dirty: true,
            markers: Vec::new(),
            route_paths: Vec::new(),
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn viewport(&self) -> ViewportContext {
        self.scale.context()
    }

    pub fn is_navigation_enabled(&self) -> bool {
        self.intro_done && self.map.is_ready()
    }

    /// First visit: the welcome card should open on its own.
    pub fn should_show_welcome(&self) -> bool {
        !self.prefs.has_seen_welcome
    }

    pub fn map_style(&self) -> Option<&MapStyle> {
        let styles = &self.config.map.styles;
        styles.get(self.prefs.style_index(styles.len()))
    }

    fn frame_index(&self) -> u64 {
        self.clock.last().map_or(0, |f| f.index)
    }

    // ---- navigation -------------------------------------------------------

    /// Sends the indicator to `id`. Ignored until the marker intro is over.
    pub fn navigate_to(&mut self, id: WaypointId, now: Time) -> bool {
        if !self.is_navigation_enabled() {
            tracing::trace!(waypoint = %id, "navigation ignored before intro");
            return false;
        }
        self.animator.request_target(id, now, &self.route)
    }

    pub fn next(&mut self, now: Time) -> bool {
        let from = self.animator.target().unwrap_or(self.animator.current_marker());
        let max = self.route.waypoints().max_id();
        if from.get() >= max {
            return false;
        }
        self.navigate_to(WaypointId(from.get() + 1), now)
    }

    pub fn previous(&mut self, now: Time) -> bool {
        let from = self.animator.target().unwrap_or(self.animator.current_marker());
        if from.get() <= 1 {
            return false;
        }
        self.navigate_to(WaypointId(from.get() - 1), now)
    }

    // ---- host notifications -----------------------------------------------

    pub fn on_map_loaded(&mut self, now: Time) {
        if let Some(event) = self.map.on_loaded() {
            self.route_map_event(event, now);
        }
    }

    pub fn on_map_error(&mut self, message: &str, now: Time) {
        if let Some(event) = self.map.on_error(message, now) {
            self.route_map_event(event, now);
        }
    }

    pub fn on_resize(&mut self, resolution: Resolution, now: Time) {
        self.scale.on_resize(resolution, now);
        self.welcome.on_resize(now);
        self.geometry_dirty = true;
    }

    /// The camera moved, zoomed, rotated or pitched; markers and paths are
    /// reprojected on the next tick.
    pub fn on_map_moved(&mut self) {
        self.geometry_dirty = true;
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64, sink: &mut dyn StyleSink) {
        let change = self.scale.set_pixel_ratio(ratio, sink);
        self.events
            .emit(self.frame_index(), ShowcaseEvent::ScaleChanged(change));
    }

    pub fn set_auto_thresholds(&mut self, enabled: bool, sink: &mut dyn StyleSink) {
        if let Some(change) = self.scale.set_auto_thresholds(enabled, sink) {
            self.events
                .emit(self.frame_index(), ShowcaseEvent::ScaleChanged(change));
        }
    }

    pub fn on_image_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        self.gallery.on_load(ticket, outcome)
    }

    pub fn expand_image(&mut self, position: usize, rect: Rect, viewport: Rect, slow: bool) -> bool {
        let speed = if slow {
            ExpansionSpeed::Slow
        } else {
            ExpansionSpeed::Normal
        };
        self.gallery.expand(position, rect, viewport, speed)
    }

    pub fn collapse_image(&mut self, now: Time) {
        self.gallery.collapse(now);
    }

    pub fn on_card_transition_finished(&mut self, now: Time) {
        self.card.on_transition_finished(now);
    }

    /// Opens or closes the welcome card. Closing it remembers the visit.
    pub fn toggle_welcome(&mut self, origin: Rect, now: Time, store: &mut dyn PreferenceStore) -> bool {
        let was_expanded = self.welcome.is_expanded();
        let changed = self.welcome.toggle(origin, now);
        if changed && was_expanded && !self.prefs.has_seen_welcome {
            self.prefs.has_seen_welcome = true;
            self.persist(store);
        }
        changed
    }

    /// Switches to the next configured map style and remembers the choice.
    pub fn cycle_map_style(&mut self, store: &mut dyn PreferenceStore) -> Option<MapStyle> {
        let count = self.config.map.styles.len();
        let index = self.prefs.cycle_style(count);
        self.persist(store);
        let style = self.config.map.styles.get(index)?.clone();
        self.events.emit(
            self.frame_index(),
            ShowcaseEvent::StyleChanged {
                index,
                url: style.url.clone(),
            },
        );
        Some(style)
    }

    fn persist(&self, store: &mut dyn PreferenceStore) {
        if let Err(err) = self.prefs.save(store) {
            tracing::warn!(error = %err, "could not save preferences");
        }
    }

    // ---- frame --------------------------------------------------------------

    pub fn tick(
        &mut self,
        now: Time,
        projector: &dyn Projector,
        probe: &dyn LayoutProbe,
        sink: &mut dyn StyleSink,
    ) -> FrameOutput {
        let frame = self.clock.advance(now);
        let now = frame.now;

        if let Some(event) = self.map.tick(now) {
            self.route_map_event(event, now);
        }
        if !self.intro_done
            && let Some(ends) = self.intro_ends
            && now.ms() >= ends.ms()
        {
            self.intro_done = true;
            self.events.emit(frame.index, ShowcaseEvent::IntroFinished);
        }

        if let Some(change) = self.scale.tick(now, sink) {
            self.events
                .emit(frame.index, ShowcaseEvent::ScaleChanged(change));
            self.geometry_dirty = true;
        }

        let step = self.animator.tick(now, &self.route, projector);
        self.gallery.set_fast_mode(self.animator.is_animating());
        if let Some(id) = step.marker_changed
            && self.reported_marker != Some(id)
        {
            let name = self
                .route
                .waypoint(id)
                .map(|w| w.name.clone())
                .unwrap_or_default();
            self.events.emit(
                frame.index,
                ShowcaseEvent::MarkerChanged {
                    id,
                    previous: self.reported_marker,
                    name,
                },
            );
            self.reported_marker = Some(id);
            self.geometry_dirty = true;
        }
        if step.completed
            && let Some(id) = step.marker_changed
        {
            self.events
                .emit(frame.index, ShowcaseEvent::AnimationCompleted { id });
        }

        let mut events = self.dispatch(now);

        self.gallery.tick(now, probe);
        self.card.tick(now);
        match self.welcome.tick(now) {
            Some(WelcomeEvent::Expanded) => events.push(ShowcaseEvent::WelcomeExpanded),
            Some(WelcomeEvent::Collapsed) => events.push(ShowcaseEvent::WelcomeCollapsed),
            None => {}
        }

        let geometry_changed = std::mem::take(&mut self.geometry_dirty);
        if geometry_changed {
            self.markers = self.marker_views(projector);
            self.route_paths = self
                .route
                .screen_curves(projector)
                .iter()
                .map(|c| c.svg_path())
                .collect();
        }

        FrameOutput {
            frame: frame.index,
            now,
            viewport: self.scale.context(),
            map: self.map.status().clone(),
            navigation_enabled: self.is_navigation_enabled(),
            indicator: step.point,
            position: step.position,
            current_marker: self.animator.current_marker(),
            geometry_changed,
            markers: self.markers.clone(),
            route_paths: self.route_paths.clone(),
            card_text: self.card.current().to_string(),
            card_commands: self.card.drain_commands(),
            gallery_commands: self.gallery.drain_commands(),
            image_overlay: self.gallery.overlay_rect(now),
            welcome: self.welcome.view(),
            events,
        }
    }

    /// Drains the bus, applying cross-component reactions, and returns the
    /// drained payloads for the host.
    fn dispatch(&mut self, now: Time) -> Vec<ShowcaseEvent> {
        let drained = self.events.drain();
        let mut out = Vec::with_capacity(drained.len());
        for event in drained {
            if let ShowcaseEvent::MarkerChanged { id, previous, name } = &event.payload {
                self.gallery.set_waypoint(*id, now);
                if let Some(previous) = previous {
                    let direction = if id > previous {
                        Direction::Forward
                    } else {
                        Direction::Backward
                    };
                    self.card.enqueue(name.clone(), direction, now);
                }
            }
            out.push(event.payload);
        }
        out
    }

    fn route_map_event(&mut self, event: MapEvent, now: Time) {
        let index = self.frame_index();
        match event {
            MapEvent::Ready => {
                let total = self.config.intro.total_ms(self.route.len());
                self.intro_ends = Some(now.plus_ms(total));
                self.geometry_dirty = true;
                self.events.emit(index, ShowcaseEvent::MapReady);
            }
            MapEvent::Failed(err) => self.events.emit(
                index,
                ShowcaseEvent::MapFailed {
                    message: err.to_string(),
                },
            ),
            MapEvent::ReloadRequested => self.events.emit(index, ShowcaseEvent::ReloadRequested),
        }
    }

    fn marker_views(&self, projector: &dyn Projector) -> Vec<MarkerView> {
        let current = self.animator.current_marker();
        self.route
            .waypoints()
            .iter()
            .enumerate()
            .map(|(i, w)| MarkerView {
                id: w.id,
                name: w.name.clone(),
                point: projector.project(w.coordinates),
                active: w.id == current,
                intro_delay_ms: i as f64 * self.config.intro.per_marker_ms,
            })
            .collect()
    }
}
