use chrono::Locale;
use i18n_embed::{
    DefaultLocalizer, LanguageLoader, Localizer,
    fluent::{FluentLanguageLoader, fluent_language_loader},
    unic_langid::LanguageIdentifier,
};
use once_cell::sync::Lazy;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

pub static LANGUAGE_LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let loader: FluentLanguageLoader = fluent_language_loader!();

    loader
        .load_fallback_language(&Localizations)
        .expect("Error while loading fallback language");

    // Plain terminal output; no bidi isolation marks around arguments.
    loader.set_use_isolating(false);

    loader
});

#[macro_export]
macro_rules! fl {
    ($message_id:literal) => {{
        i18n_embed_fl::fl!($crate::localize::LANGUAGE_LOADER, $message_id)
    }};

    ($message_id:literal, $($args:expr),*) => {{
        i18n_embed_fl::fl!($crate::localize::LANGUAGE_LOADER, $message_id, $($args), *)
    }};
}

pub fn localizer() -> Box<dyn Localizer> {
    Box::from(DefaultLocalizer::new(&*LANGUAGE_LOADER, &Localizations))
}

/// Select the user's desktop languages, falling back to English.
pub fn localize() {
    let localizer = localizer();
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    if let Err(error) = localizer.select(&requested_languages) {
        log::warn!("Error while loading language: {}", error);
    }
    LANGUAGE_LOADER.set_use_isolating(false);
}

/// Date locale for the first requested language chrono knows, e.g.
/// `de-AT` → `de_AT`, `fr` → `fr_FR`. POSIX when none match.
pub fn locale_for(requested: &[LanguageIdentifier]) -> Locale {
    requested
        .iter()
        .find_map(|lang| {
            let language = lang.language.as_str();
            let mut candidates = Vec::new();
            if let Some(region) = lang.region {
                candidates.push(format!("{}_{}", language, region.as_str()));
            }
            candidates.push(format!("{}_{}", language, language.to_ascii_uppercase()));
            if language == "en" {
                candidates.push("en_US".to_string());
            }
            candidates
                .iter()
                .find_map(|name| Locale::try_from(name.as_str()).ok())
        })
        .unwrap_or(Locale::POSIX)
}

/// Date locale of the desktop session.
pub fn date_locale() -> Locale {
    locale_for(&i18n_embed::DesktopLanguageRequester::requested_languages())
}
