//! The fixed font catalog offered by the form.
//!
//! Two style groups, each led by a generic "Default" entry that maps to the
//! platform-generic family. Anything outside the catalog is rejected by the
//! form; an installed-but-missing family degrades silently to whatever the
//! rasterizer substitutes.

/// Generic family used by the serif group's "Default" entry.
pub const GENERIC_SERIF: &str = "serif";

/// Generic family used by the sans-serif group's "Default" entry.
pub const GENERIC_SANS: &str = "sans-serif";

/// Named serif families.
pub const SERIF_FONTS: &[&str] = &[
    "Alegreya",
    "Almendra",
    "Amiri",
    "Arvo",
    "Cormorant",
    "Crimson Text",
    "Droid Serif",
    "EB Garamond",
    "Fanwood Text",
    "Gentium Basic",
    "Judson",
    "Lora",
    "Merriweather",
    "Neuton",
    "Old Standard TT",
    "Playfair Display",
    "PT Serif",
    "Quattrocento",
    "Roboto Slab",
    "Spectral",
    "Tinos",
    "Vollkorn",
    "Yeseva One",
];

/// Named sans-serif families.
pub const SANS_FONTS: &[&str] = &[
    "Abel",
    "Arimo",
    "Barlow",
    "Cabin",
    "Droid Sans",
    "Exo",
    "Fira Sans",
    "Gothic A1",
    "Hind",
    "IBM Plex Sans",
    "Josefin Sans",
    "Kanit",
    "Lato",
    "Montserrat",
    "Noto Sans",
    "Open Sans",
    "PT Sans",
    "Quicksand",
    "Raleway",
    "Roboto",
    "Source Sans Pro",
    "Ubuntu",
    "Varela Round",
];

/// Style group a catalog family belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontGroup {
    Serif,
    Sans,
}

/// Returns the group a family belongs to, or `None` if it is not in the
/// catalog.
pub fn group_of(family: &str) -> Option<FontGroup> {
    if family == GENERIC_SERIF || SERIF_FONTS.contains(&family) {
        Some(FontGroup::Serif)
    } else if family == GENERIC_SANS || SANS_FONTS.contains(&family) {
        Some(FontGroup::Sans)
    } else {
        None
    }
}

/// Returns true if `family` is a member of the fixed catalog.
pub fn is_catalog_family(family: &str) -> bool {
    group_of(family).is_some()
}

/// Iterates over every selectable family, generics first within each group.
pub fn catalog() -> impl Iterator<Item = (&'static str, FontGroup)> {
    std::iter::once((GENERIC_SERIF, FontGroup::Serif))
        .chain(SERIF_FONTS.iter().map(|f| (*f, FontGroup::Serif)))
        .chain(std::iter::once((GENERIC_SANS, FontGroup::Sans)))
        .chain(SANS_FONTS.iter().map(|f| (*f, FontGroup::Sans)))
}
