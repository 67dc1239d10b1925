//! The fixed table of content languages the feed can be switched to.
//!
//! This is static configuration: each entry maps a Wikipedia subdomain code to
//! a display label, a flag and the region it is grouped under in the language
//! picker.  Table order is picker order.

/// Grouping used by the language picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    Europe,
    LatinAmerica,
    India,
    EastAsia,
}

impl Region {
    pub fn label(self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::LatinAmerica => "Latin America",
            Region::India => "India",
            Region::EastAsia => "East Asia",
        }
    }
}

/// One selectable content language.
#[derive(Debug, PartialEq, Eq)]
pub struct Language {
    /// Subdomain code, e.g. `"en"` for `en.wikipedia.org`.
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    pub region: Region,
}

impl Language {
    /// Look up a language by its code.
    pub fn from_code(code: &str) -> Option<&'static Language> {
        LANGUAGES.iter().find(|lang| lang.code == code)
    }

    /// Position of `code` in [`LANGUAGES`].
    pub fn index_of(code: &str) -> Option<usize> {
        LANGUAGES.iter().position(|lang| lang.code == code)
    }

    /// Label shown in the header, e.g. `"🇫🇷 French"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.flag, self.name)
    }
}

pub const DEFAULT_LANGUAGE: &str = "en";

const fn lang(
    code: &'static str,
    name: &'static str,
    flag: &'static str,
    region: Region,
) -> Language {
    Language {
        code,
        name,
        flag,
        region,
    }
}

pub static LANGUAGES: &[Language] = &[
    lang("en", "English (US)", "🇺🇸", Region::NorthAmerica),
    lang("en-gb", "English (UK)", "🇬🇧", Region::Europe),
    lang("es", "Spanish", "🇪🇸", Region::Europe),
    lang("fr", "French", "🇫🇷", Region::Europe),
    lang("de", "German", "🇩🇪", Region::Europe),
    lang("it", "Italian", "🇮🇹", Region::Europe),
    lang("pt", "Portuguese", "🇵🇹", Region::Europe),
    lang("nl", "Dutch", "🇳🇱", Region::Europe),
    lang("pl", "Polish", "🇵🇱", Region::Europe),
    lang("ru", "Russian", "🇷🇺", Region::Europe),
    lang("sv", "Swedish", "🇸🇪", Region::Europe),
    lang("pt-br", "Portuguese (Brazil)", "🇧🇷", Region::LatinAmerica),
    lang("hi", "Hindi", "🇮🇳", Region::India),
    lang("bn", "Bengali", "🇮🇳", Region::India),
    lang("ta", "Tamil", "🇮🇳", Region::India),
    lang("te", "Telugu", "🇮🇳", Region::India),
    lang("mr", "Marathi", "🇮🇳", Region::India),
    lang("gu", "Gujarati", "🇮🇳", Region::India),
    lang("kn", "Kannada", "🇮🇳", Region::India),
    lang("ml", "Malayalam", "🇮🇳", Region::India),
    lang("zh", "中文", "🇨🇳", Region::EastAsia),
    lang("ja", "日本語", "🇯🇵", Region::EastAsia),
    lang("ko", "한국어", "🇰🇷", Region::EastAsia),
    lang("vi", "Tiếng Việt", "🇻🇳", Region::EastAsia),
    lang("th", "ไทย", "🇹🇭", Region::EastAsia),
    lang("id", "Bahasa Indonesia", "🇮🇩", Region::EastAsia),
];
