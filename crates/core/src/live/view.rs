//! The reconciliation engine.
//!
//! [`LiveView`] owns the canonical vehicle, case, and facility collections
//! plus every derived marker and route-layer handle. It consumes full
//! snapshots and incremental position events, emitting the minimal render
//! commands that bring the rendered view in line with canonical state. A
//! command with no visible effect is never emitted.
//!
//! All methods are synchronous and infallible: failures inside a pass (bad
//! route geometry, unknown ids) degrade to skipping the affected element.
//! The session feeds operations sequentially from one apply loop, so no
//! locking happens here.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;

use crate::config::TrackerConfig;
use crate::constants::FALLBACK_ROUTE_COLOR;
use crate::dispatch::{Case, CaseId};
use crate::errors::FetchError;
use crate::facilities::{Facility, FacilityId};
use crate::fleet::{PositionUpdate, Vehicle, VehicleId};
use crate::geo::{self, LngLat};
use crate::live::types::ResourceKind;
use crate::render::{MarkerId, MarkerMeta, RenderCommand, RenderSink};

/// A drawn route: one line layer plus its two endpoint markers.
#[derive(Clone, Debug)]
pub struct RouteLayer {
    /// Case this layer belongs to.
    pub case_id: CaseId,
    /// Color assigned from the palette at draw time.
    pub color: String,
    /// Decoded geometry in renderer order.
    pub coordinates: Vec<LngLat>,
}

/// Counters derived from canonical state, for dashboards and status logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LiveStats {
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub active_cases: usize,
    pub drawn_routes: usize,
    pub total_facilities: usize,
    pub available_facilities: usize,
    pub refresh_failures: u64,
}

/// The authoritative in-memory view model.
pub struct LiveView {
    config: TrackerConfig,
    sink: Arc<dyn RenderSink>,
    /// Canonical vehicle records, keyed by id.
    vehicles: BTreeMap<VehicleId, Vehicle>,
    /// Canonical case list in snapshot order (first occurrence wins the slot).
    cases: Vec<Case>,
    /// Canonical facility records, keyed by id.
    facilities: BTreeMap<FacilityId, Facility>,
    /// Currently drawn route layers, in draw order.
    routes: Vec<RouteLayer>,
    /// Whether vehicle markers are currently on the map.
    vehicles_visible: bool,
    /// Cumulative failed snapshot refreshes.
    refresh_failures: u64,
}

impl LiveView {
    /// Create an empty view emitting into `sink`.
    pub fn new(config: TrackerConfig, sink: Arc<dyn RenderSink>) -> Self {
        let vehicles_visible = config.vehicles_visible;
        Self {
            config,
            sink,
            vehicles: BTreeMap::new(),
            cases: Vec::new(),
            facilities: BTreeMap::new(),
            routes: Vec::new(),
            vehicles_visible,
            refresh_failures: 0,
        }
    }

    /// Reconcile the canonical vehicle set against a fresh snapshot.
    ///
    /// Unseen ids gain a marker, changed records move/restyle their marker in
    /// place, vanished ids lose record and marker. Records are compared by
    /// value, never by identity: the fetch layer always constructs fresh
    /// objects, so an unchanged vehicle emits nothing.
    pub fn apply_vehicle_snapshot(&mut self, snapshot: Vec<Vehicle>) {
        let incoming = dedupe_last_write_wins(snapshot, |v| v.id);

        let mut next = BTreeMap::new();
        for vehicle in incoming {
            let changed = match self.vehicles.get(&vehicle.id) {
                Some(previous) => previous != &vehicle,
                None => true,
            };
            if changed && self.vehicles_visible {
                self.sink.apply(RenderCommand::UpsertMarker {
                    id: MarkerId::Vehicle(vehicle.id),
                    position: vehicle.position(),
                    meta: vehicle_meta(&vehicle),
                });
            }
            next.insert(vehicle.id, vehicle);
        }

        if self.vehicles_visible {
            for id in self.vehicles.keys() {
                if !next.contains_key(id) {
                    self.sink
                        .apply(RenderCommand::RemoveMarker { id: MarkerId::Vehicle(*id) });
                }
            }
        }

        self.vehicles = next;
    }

    /// Apply an incremental position event.
    ///
    /// Position-only: availability and case assignment are untouched. Events
    /// for unknown ids are dropped; full attributes only ever arrive via
    /// snapshot, so no vehicle is synthesized here.
    pub fn apply_position_update(&mut self, update: PositionUpdate) {
        let vehicle = match self.vehicles.get_mut(&update.vehicle_id) {
            Some(v) => v,
            None => {
                debug!(
                    "Dropping position event for unknown vehicle {}",
                    update.vehicle_id
                );
                return;
            }
        };

        if vehicle.latitude == update.latitude && vehicle.longitude == update.longitude {
            return;
        }
        vehicle.latitude = update.latitude;
        vehicle.longitude = update.longitude;

        if self.vehicles_visible {
            self.sink.apply(RenderCommand::UpsertMarker {
                id: MarkerId::Vehicle(vehicle.id),
                position: vehicle.position(),
                meta: vehicle_meta(vehicle),
            });
        }
    }

    /// Reconcile the canonical case list against a fresh snapshot.
    ///
    /// The canonical list is always replaced, so list consumers see every
    /// field change. Route layers rebuild only on a material difference:
    /// a count change, an id not seen before, or a status or route-geometry
    /// change on any case. The rebuild is all-or-nothing; byte-identical
    /// poll results must not repaint anything.
    pub fn apply_case_snapshot(&mut self, snapshot: Vec<Case>) {
        let incoming = dedupe_last_write_wins(snapshot, |c| c.id);
        let material = self.case_difference_is_material(&incoming);
        self.cases = incoming;
        if material {
            self.rebuild_routes();
        }
    }

    /// Reconcile the canonical facility set against a fresh snapshot.
    ///
    /// Same discipline as vehicles: upsert on new or changed, remove on
    /// vanished, nothing on unchanged. Facilities have no visibility toggle
    /// and no push events.
    pub fn apply_facility_snapshot(&mut self, snapshot: Vec<Facility>) {
        let incoming = dedupe_last_write_wins(snapshot, |f| f.id);

        let mut next = BTreeMap::new();
        for facility in incoming {
            let changed = match self.facilities.get(&facility.id) {
                Some(previous) => previous != &facility,
                None => true,
            };
            if changed {
                self.sink.apply(RenderCommand::UpsertMarker {
                    id: MarkerId::Facility(facility.id),
                    position: facility.position(),
                    meta: facility_meta(&facility),
                });
            }
            next.insert(facility.id, facility);
        }

        for id in self.facilities.keys() {
            if !next.contains_key(id) {
                self.sink
                    .apply(RenderCommand::RemoveMarker { id: MarkerId::Facility(*id) });
            }
        }

        self.facilities = next;
    }

    /// Note a failed snapshot refresh. The previous snapshot stays
    /// authoritative; the next poll tick is the retry.
    pub fn record_refresh_failure(&mut self, kind: ResourceKind, error: &FetchError) {
        self.refresh_failures += 1;
        warn!(
            "Refresh of {} failed, keeping previous snapshot: {}",
            kind, error
        );
    }

    /// Show or hide vehicle markers without touching canonical state.
    ///
    /// Hiding removes the markers from the map; showing replays them from
    /// the canonical map. A hide/show cycle is lossless and needs no
    /// refetch.
    pub fn set_vehicles_visible(&mut self, visible: bool) {
        if self.vehicles_visible == visible {
            return;
        }
        self.vehicles_visible = visible;

        if visible {
            for vehicle in self.vehicles.values() {
                self.sink.apply(RenderCommand::UpsertMarker {
                    id: MarkerId::Vehicle(vehicle.id),
                    position: vehicle.position(),
                    meta: vehicle_meta(vehicle),
                });
            }
        } else {
            for id in self.vehicles.keys() {
                self.sink
                    .apply(RenderCommand::RemoveMarker { id: MarkerId::Vehicle(*id) });
            }
        }
    }

    /// Whether vehicle markers are currently shown.
    pub fn vehicles_visible(&self) -> bool {
        self.vehicles_visible
    }

    /// Non-terminal cases in stable snapshot order.
    pub fn visible_cases(&self) -> Vec<Case> {
        self.cases
            .iter()
            .filter(|c| !c.status.is_terminal())
            .cloned()
            .collect()
    }

    /// Counters derived from canonical state.
    pub fn stats(&self) -> LiveStats {
        LiveStats {
            total_vehicles: self.vehicles.len(),
            available_vehicles: self.vehicles.values().filter(|v| v.available).count(),
            active_cases: self
                .cases
                .iter()
                .filter(|c| !c.status.is_terminal())
                .count(),
            drawn_routes: self.routes.len(),
            total_facilities: self.facilities.len(),
            available_facilities: self.facilities.values().filter(|f| f.available).count(),
            refresh_failures: self.refresh_failures,
        }
    }

    /// Canonical vehicle record, if tracked.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    /// Currently drawn route layers, in draw order.
    pub fn route_layers(&self) -> &[RouteLayer] {
        &self.routes
    }

    /// Release every rendered resource and clear canonical state.
    ///
    /// Idempotent: a second call finds nothing left to release.
    pub fn dispose(&mut self) {
        if self.vehicles_visible {
            for id in self.vehicles.keys() {
                self.sink
                    .apply(RenderCommand::RemoveMarker { id: MarkerId::Vehicle(*id) });
            }
        }
        for id in self.facilities.keys() {
            self.sink
                .apply(RenderCommand::RemoveMarker { id: MarkerId::Facility(*id) });
        }
        remove_route_layers(self.sink.as_ref(), &self.routes);

        self.vehicles.clear();
        self.cases.clear();
        self.facilities.clear();
        self.routes.clear();
    }

    /// True when `incoming` differs from the current case list in a way that
    /// requires repainting routes.
    fn case_difference_is_material(&self, incoming: &[Case]) -> bool {
        if incoming.len() != self.cases.len() {
            return true;
        }
        let previous: HashMap<CaseId, &Case> = self.cases.iter().map(|c| (c.id, c)).collect();
        incoming.iter().any(|case| match previous.get(&case.id) {
            Some(prev) => {
                prev.status != case.status || prev.route_geometry != case.route_geometry
            }
            None => true,
        })
    }

    /// Tear down every route layer and redraw from canonical state.
    ///
    /// Cases are drawn in canonical order; terminal cases, cases without
    /// geometry, and cases whose geometry fails to decode consume no palette
    /// slot.
    fn rebuild_routes(&mut self) {
        remove_route_layers(self.sink.as_ref(), &self.routes);
        self.routes.clear();

        for case in &self.cases {
            if case.status.is_terminal() {
                continue;
            }
            let encoded = match case.route_geometry_trimmed() {
                Some(g) => g,
                None => continue,
            };
            let coordinates = match geo::decode(encoded) {
                Ok(c) => c,
                Err(error) => {
                    warn!("Skipping route for case {}: {}", case.id, error);
                    continue;
                }
            };
            let (start, end) = match (coordinates.first(), coordinates.last()) {
                (Some(s), Some(e)) => (*s, *e),
                _ => continue,
            };

            let color = route_color(&self.config.route_palette, self.routes.len());
            self.sink.apply(RenderCommand::UpsertRouteLayer {
                id: case.id,
                coordinates: coordinates.clone(),
                color: color.clone(),
            });
            self.sink.apply(RenderCommand::UpsertMarker {
                id: MarkerId::RouteStart(case.id),
                position: start,
                meta: MarkerMeta {
                    label: format!("Case {} start", case.id),
                    available: None,
                },
            });
            self.sink.apply(RenderCommand::UpsertMarker {
                id: MarkerId::RouteEnd(case.id),
                position: end,
                meta: MarkerMeta {
                    label: format!("Case {} end", case.id),
                    available: None,
                },
            });

            self.routes.push(RouteLayer {
                case_id: case.id,
                color,
                coordinates,
            });
        }

        if self.config.fit_view_on_rebuild && !self.routes.is_empty() {
            let coordinates = self
                .routes
                .iter()
                .flat_map(|layer| layer.coordinates.iter().copied())
                .collect();
            self.sink.apply(RenderCommand::FitView { coordinates });
        }
    }
}

/// Remove each layer's line and endpoint markers from the sink.
fn remove_route_layers(sink: &dyn RenderSink, routes: &[RouteLayer]) {
    for layer in routes {
        sink.apply(RenderCommand::RemoveRouteLayer { id: layer.case_id });
        sink.apply(RenderCommand::RemoveMarker {
            id: MarkerId::RouteStart(layer.case_id),
        });
        sink.apply(RenderCommand::RemoveMarker {
            id: MarkerId::RouteEnd(layer.case_id),
        });
    }
}

/// Collapse duplicate ids within one snapshot: the first occurrence keeps
/// its position in iteration order, the last occurrence supplies the values.
fn dedupe_last_write_wins<T, F>(items: Vec<T>, id_of: F) -> Vec<T>
where
    F: Fn(&T) -> i64,
{
    let mut order: Vec<i64> = Vec::with_capacity(items.len());
    let mut latest: HashMap<i64, T> = HashMap::with_capacity(items.len());
    for item in items {
        let id = id_of(&item);
        if !latest.contains_key(&id) {
            order.push(id);
        }
        latest.insert(id, item);
    }
    order.into_iter().filter_map(|id| latest.remove(&id)).collect()
}

/// Palette color for the `index`-th drawn route.
fn route_color(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        return FALLBACK_ROUTE_COLOR.to_string();
    }
    palette[index % palette.len()].clone()
}

/// Marker attributes for a vehicle record.
fn vehicle_meta(vehicle: &Vehicle) -> MarkerMeta {
    MarkerMeta {
        label: vehicle.label(),
        available: Some(vehicle.available),
    }
}

/// Marker attributes for a facility record.
fn facility_meta(facility: &Facility) -> MarkerMeta {
    MarkerMeta {
        label: facility.label(),
        available: Some(facility.available),
    }
}
