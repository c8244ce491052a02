/// Short names accepted for well-known venues
const VENUE_ALIASES: &[(&str, &str)] = &[
    ("msg", "Madison+Square+Garden"),
    ("madison square garden", "Madison+Square+Garden"),
    ("yankee stadium", "Yankee+Stadium"),
    ("yankees", "Yankee+Stadium"),
    ("citi field", "Citi+Field"),
    ("mets", "Citi+Field"),
    ("barclays", "Barclays+Center"),
    ("barclays center", "Barclays+Center"),
    ("ubs arena", "UBS+Arena"),
    ("metlife", "MetLife+Stadium"),
    ("metlife stadium", "MetLife+Stadium"),
];

/// Resolves a venue name to the site's `+`-joined form
///
/// Known aliases map to their canonical name; anything else has its spaces
/// replaced by `+`.
///
/// # Examples
///
/// ```
/// use seatview::config::resolve_venue_name;
///
/// assert_eq!(resolve_venue_name("MSG"), "Madison+Square+Garden");
/// assert_eq!(resolve_venue_name("Fenway Park"), "Fenway+Park");
/// ```
pub fn resolve_venue_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();

    VENUE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| name.trim().replace(' ', "+"))
}
