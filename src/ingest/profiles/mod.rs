//! Built-in language profiles.
//!
//! Each submodule exposes `profile()` building one [`LanguageProfile`]
//! table. [`all`] compiles every table once and hands out `'static`
//! references, in registration order.

use once_cell::sync::Lazy;

use crate::ingest::profile::{CommentSyntax, LanguageProfile};
use crate::ingest::Language;

pub mod c;
pub mod cpp;
pub mod csharp;
pub mod dart;
pub mod go;
pub mod java;
pub mod javascript;
pub mod kotlin;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod scala;
pub mod swift;
pub mod typescript;

/// `//` and `/* */`.
pub(crate) const C_STYLE_COMMENTS: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: &[("/*", "*/")],
};

static PROFILES: Lazy<Vec<LanguageProfile>> = Lazy::new(|| {
    vec![
        csharp::profile(),
        java::profile(),
        kotlin::profile(),
        scala::profile(),
        python::profile(),
        javascript::profile(),
        typescript::profile(),
        go::profile(),
        rust::profile(),
        c::profile(),
        cpp::profile(),
        ruby::profile(),
        php::profile(),
        swift::profile(),
        dart::profile(),
    ]
});

/// Every built-in profile, in registration order.
pub fn all() -> &'static [LanguageProfile] {
    &PROFILES
}

/// Profile by id (`csharp`, `cpp`, ...).
pub fn by_id(id: &str) -> Option<&'static LanguageProfile> {
    all().iter().find(|p| p.id == id)
}

/// Profile reading files of a language.
pub fn for_language(language: Language) -> Option<&'static LanguageProfile> {
    all().iter().find(|p| p.language == language)
}

/// Replace `%M%` in a pattern template with a modifier fragment.
pub(crate) fn with_modifiers(template: &str, modifiers: &str) -> String {
    template.replace("%M%", modifiers)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_profile_ids_and_extensions_are_unique() {
        let mut ids = HashSet::new();
        let mut extensions = HashSet::new();
        for profile in all() {
            assert!(ids.insert(profile.id), "duplicate id {}", profile.id);
            for ext in profile.extensions {
                assert!(extensions.insert(*ext), "extension {} claimed twice", ext);
            }
        }
        assert_eq!(all().len(), 15);
    }

    #[test]
    fn test_every_profile_claims_its_language_extensions() {
        for profile in all() {
            for ext in profile.extensions {
                assert_eq!(
                    Language::from_extension(ext),
                    Some(profile.language),
                    "{} extension {}",
                    profile.id,
                    ext
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(by_id("go").map(|p| p.language), Some(Language::Go));
        assert_eq!(for_language(Language::Cpp).map(|p| p.id), Some("cpp"));
        assert!(by_id("cobol").is_none());
    }
}
