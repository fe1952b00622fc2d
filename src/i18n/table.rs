//! Explicit English ↔ Spanish page mappings.
//!
//! Deeper pages that are not listed here are handled by the prefix rules in
//! `translate.rs`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Canonical English path → canonical Spanish path.
pub const EN_TO_ES: &[(&str, &str)] = &[
    ("/", "/es/"),
    ("/about/", "/es/sobre-nosotros/"),
    ("/mission/", "/es/mision/"),
    ("/contact/", "/es/contacto/"),
    ("/trip-builder/", "/es/planificador-de-viajes/"),
    ("/regions/", "/es/regiones/"),
    ("/experiences/", "/es/experiencias/"),
    ("/experiences/adventure/", "/es/experiencias/aventura/"),
    ("/experiences/nature/", "/es/experiencias/naturaleza/"),
    ("/experiences/wildlife-birding/", "/es/experiencias/vida-silvestre-y-aves/"),
    ("/experiences/relaxation/", "/es/experiencias/relajacion/"),
    ("/experiences/culinary/", "/es/experiencias/gastronomia/"),
    ("/experiences/culture/", "/es/experiencias/cultura/"),
    ("/regions/galapagos/", "/es/regiones/galapagos/"),
    ("/regions/coast/", "/es/regiones/costa/"),
    ("/regions/andes/", "/es/regiones/andes/"),
    ("/regions/amazon/", "/es/regiones/amazonia/"),
];

static FORWARD: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| EN_TO_ES.iter().copied().collect());

static REVERSE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| EN_TO_ES.iter().map(|&(en, es)| (es, en)).collect());

/// Spanish counterpart of an explicitly mapped English path.
pub fn spanish_for(en: &str) -> Option<&'static str> {
    FORWARD.get(en).copied()
}

/// English counterpart of an explicitly mapped Spanish path.
pub fn english_for(es: &str) -> Option<&'static str> {
    REVERSE.get(es).copied()
}
