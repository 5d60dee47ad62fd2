//! Static application-layer routing tables, keyed by [`route_key`].
use crate::protocol::dgn::*;

/// What the dispatcher does with an application-layer DGN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// Field registry set command.
    FieldSet,
    /// Field registry get command.
    FieldGet,
    /// RV-C command whose byte 0 is the target instance.
    InstanceCommand,
    /// Command addressed to the node as a whole (destination address only).
    NodeCommand,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    pub key: u32,
    pub route: Route,
}

const fn entry(key: u32, route: Route) -> RouteEntry {
    RouteEntry { key, route }
}

/// Vendor field protocol, sorted by key.
pub static FIELD_ROUTES: &[RouteEntry] = &[
    entry(SENSATA_FIELD_SET_COMMAND, Route::FieldSet),
    entry(SENSATA_FIELD_GET_COMMAND, Route::FieldGet),
];

/// RV-C commands forwarded to the device, sorted by key.
pub static RVC_ROUTES: &[RouteEntry] = &[
    entry(GENERAL_RESET, Route::NodeCommand),
    entry(DC_SOURCE_COMMAND, Route::InstanceCommand),
    entry(DC_DISCONNECT_COMMAND, Route::InstanceCommand),
    entry(CHARGER_CONFIGURATION_COMMAND_2, Route::InstanceCommand),
    entry(CHARGER_EQUALIZATION_CONFIGURATION_COMMAND, Route::InstanceCommand),
    entry(CHARGER_CONFIGURATION_COMMAND, Route::InstanceCommand),
    entry(CHARGER_COMMAND, Route::InstanceCommand),
    entry(INVERTER_CONFIGURATION_COMMAND_2, Route::InstanceCommand),
    entry(INVERTER_CONFIGURATION_COMMAND_1, Route::InstanceCommand),
    entry(INVERTER_COMMAND, Route::InstanceCommand),
];

/// Application tables, searched in order.
pub static APPLICATION_TABLES: &[&[RouteEntry]] = &[FIELD_ROUTES, RVC_ROUTES];

fn search(table: &[RouteEntry], key: u32) -> Option<Route> {
    table
        .binary_search_by_key(&key, |entry| entry.key)
        .ok()
        .map(|index| table[index].route)
}

/// Route of `dgn`, destination byte ignored for PDU1.
pub fn find_route(dgn: u32) -> Option<Route> {
    let key = route_key(dgn);
    APPLICATION_TABLES.iter().find_map(|table| search(table, key))
}
