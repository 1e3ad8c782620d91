//! Fixed mapping from fluorinated GHG names to estimation-service activity ids

/// Supported gases and their activity identifiers.
///
/// Matching is exact (after trimming surrounding whitespace) because the
/// external identifiers are case- and spelling-sensitive.
const ACTIVITY_TABLE: &[(&str, &str)] = &[
    ("HFC-227ea", "fugitive-hfc-227ea"),
    ("HFC-23", "fugitive-hfc-23"),
    ("HFC-236fa", "fugitive-hfc-236fa"),
    ("HFC-125", "fugitive-hfc-125"),
    ("HFC-143a", "fugitive-hfc-143a"),
    ("HFC-134a", "fugitive-hfc-134a"),
    ("HFC-32", "fugitive-hfc-32"),
    ("HFC-404A", "fugitive-hfc-404a"),
    ("HFC-407C", "fugitive-hfc-407c"),
    ("HFC-410A", "fugitive-hfc-410a"),
    ("R-22", "fugitive-hcfc-22"),
];

/// Look up the activity id for a gas name. Unknown names yield `None`.
pub fn lookup(name: &str) -> Option<&'static str> {
    let name = name.trim();
    ACTIVITY_TABLE
        .iter()
        .find(|(gas, _)| *gas == name)
        .map(|(_, id)| *id)
}

/// Names of all supported gases, in table order.
pub fn supported_gases() -> impl Iterator<Item = &'static str> {
    ACTIVITY_TABLE.iter().map(|(gas, _)| *gas)
}
