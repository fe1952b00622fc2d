//! Path translation between locales.
//!
//! # Resolution order
//! 1. Already in the target locale → unchanged
//! 2. Explicit table (forward or reverse)
//! 3. Prefix rules: regions, then experiences, then the generic `/es` prefix
//! 4. Locale root

use crate::i18n::locale::Locale;
use crate::i18n::path::normalize_path;
use crate::i18n::table;

/// Structural prefix pairs, in priority order (English, Spanish).
const PREFIX_RULES: &[(&str, &str)] = &[
    ("/regions/", "/es/regiones/"),
    ("/experiences/", "/es/experiencias/"),
];

/// Translate a site path into `target`.
///
/// Accepts relative paths and paths carrying a query or fragment; the result
/// is always a normalized path in the target locale.
pub fn translate_path(path: &str, target: Locale) -> String {
    let from = normalize_path(path);

    if Locale::of_path(&from) == target {
        return from;
    }

    let resolved = match target {
        Locale::Es => to_spanish(&from),
        Locale::En => to_english(&from),
    };

    normalize_path(&resolved.unwrap_or_else(|| target.root().to_string()))
}

fn to_spanish(from: &str) -> Option<String> {
    if let Some(es) = table::spanish_for(from) {
        return Some(es.to_string());
    }
    for (en_prefix, es_prefix) in PREFIX_RULES {
        if let Some(rest) = from.strip_prefix(en_prefix) {
            return Some(format!("{es_prefix}{rest}"));
        }
    }
    Some(format!("/es{from}"))
}

fn to_english(from: &str) -> Option<String> {
    if let Some(en) = table::english_for(from) {
        return Some(en.to_string());
    }
    for (en_prefix, es_prefix) in PREFIX_RULES {
        if let Some(rest) = from.strip_prefix(es_prefix) {
            return Some(format!("{en_prefix}{rest}"));
        }
    }
    from.strip_prefix("/es/").map(|rest| format!("/{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::table::EN_TO_ES;

    #[test]
    fn test_explicit_round_trip() {
        for (en, es) in EN_TO_ES {
            assert_eq!(translate_path(en, Locale::Es), *es);
            assert_eq!(translate_path(&translate_path(en, Locale::Es), Locale::En), *en);
        }
    }

    #[test]
    fn test_prefix_rules() {
        assert_eq!(translate_path("/regions/andes/", Locale::Es), "/es/regiones/andes/");
        assert_eq!(translate_path("/regions/sierra-norte", Locale::Es), "/es/regiones/sierra-norte/");
        assert_eq!(
            translate_path("/es/experiencias/cultura/", Locale::En),
            "/experiences/cultura/"
        );
        assert_eq!(
            translate_path("/experiences/surf/", Locale::Es),
            "/es/experiencias/surf/"
        );
        assert_eq!(translate_path("/es/regiones/oriente/", Locale::En), "/regions/oriente/");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(translate_path("/unmapped-page/", Locale::Es), "/es/unmapped-page/");
        assert_eq!(translate_path("/es/pagina-suelta/", Locale::En), "/pagina-suelta/");
        assert_eq!(translate_path("/es", Locale::En), "/");
    }

    #[test]
    fn test_idempotent_in_target_locale() {
        for path in ["/about/", "/regions/andes/", "/unmapped-page/", "/es/", "/es/regiones/x/"] {
            let once = translate_path(path, Locale::Es);
            assert_eq!(translate_path(&once, Locale::Es), once);
            let back = translate_path(path, Locale::En);
            assert_eq!(translate_path(&back, Locale::En), back);
        }
        assert_eq!(translate_path("/es/contacto/", Locale::Es), "/es/contacto/");
        assert_eq!(translate_path("/contact", Locale::En), "/contact/");
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        assert_eq!(translate_path("/contact/?from=nav#form", Locale::Es), "/es/contacto/");
        assert_eq!(translate_path("", Locale::Es), "/es/");
        assert_eq!(translate_path("#", Locale::En), "/");
    }
}
